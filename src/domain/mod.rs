// Account snapshots and tracked accounts
pub mod account;

// Rule evaluation engine
pub mod evaluation;

// Firm rule sets and presets
pub mod rules;

// Health notifications
pub mod events;

// Port interfaces
pub mod ports;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
