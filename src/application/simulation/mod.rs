pub mod adapter;

pub use adapter::{SimulationAdapter, SimulationOutcome, SimulationState};
