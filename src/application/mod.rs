// Simulation adapter
pub mod simulation;

// Account tracking and plan gating
pub mod tracking;
