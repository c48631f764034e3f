// Rule evaluation engine
pub mod checks;
pub mod engine;
pub mod policy;
pub mod types;

pub use engine::{HealthEngine, evaluate_health, simulate_trade};
pub use policy::EvaluationPolicy;
pub use types::{
    AccountMetrics, EvaluationResult, HealthStatus, RuleKind, RuleOutcome, RuleVerdict,
    SimulationResult,
};
