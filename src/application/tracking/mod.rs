pub mod account_tracker;
pub mod tier_gate;

pub use account_tracker::AccountTracker;
pub use tier_gate::{Plan, TierGate, TierLimits};
