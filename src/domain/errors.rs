use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while evaluating or simulating an account against a rule set
///
/// These are returned as values; nothing in the engine panics on bad input.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum EvaluationError {
    #[error("Invalid input: {field} {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Computation impossible: {reason}")]
    ComputationImpossible { reason: String },
}

impl EvaluationError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            Self::ComputationImpossible { .. } => None,
        }
    }
}

/// Failures surfaced by the simulation adapter
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum SimulationError {
    #[error("Simulation rejected: {0}")]
    Rejected(EvaluationError),

    #[error("Simulation transport failed: {reason}")]
    Transport { reason: String },

    #[error("Simulation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },
}

impl From<EvaluationError> for SimulationError {
    fn from(err: EvaluationError) -> Self {
        Self::Rejected(err)
    }
}

/// Errors returned by the account tracker
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Account not found: {id}")]
    AccountNotFound { id: String },

    #[error("Plan limit reached: {plan} plan allows {limit} tracked account(s)")]
    TierLimit { plan: String, limit: usize },

    #[error("Feature locked on {plan} plan: {feature}")]
    FeatureLocked { plan: String, feature: String },

    #[error("Trade of {pnl} rejected: {source}")]
    TradeRejected {
        pnl: Decimal,
        #[source]
        source: EvaluationError,
    },

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("Repository failure: {0}")]
    Repository(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_field() {
        let err = EvaluationError::invalid("max_drawdown", "is required");
        assert_eq!(err.field(), Some("max_drawdown"));
        assert_eq!(err.to_string(), "Invalid input: max_drawdown is required");
    }

    #[test]
    fn test_simulation_error_wraps_rejection() {
        let err: SimulationError = EvaluationError::ComputationImpossible {
            reason: "starting balance is zero".to_string(),
        }
        .into();

        let msg = err.to_string();
        assert!(msg.contains("Simulation rejected"));
        assert!(msg.contains("starting balance is zero"));
    }

    #[test]
    fn test_tier_limit_formatting() {
        let err = TrackerError::TierLimit {
            plan: "free".to_string(),
            limit: 1,
        };
        assert!(err.to_string().contains("free plan allows 1"));
    }
}
