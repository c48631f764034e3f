use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::errors::EvaluationError;

/// Tunables for classification and simulation
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationPolicy {
    /// Share of a limit at which it counts as approached (e.g., 0.90 = 90%)
    pub warning_threshold: Decimal,

    /// Lowest balance a simulated trade may project to
    pub balance_floor: Decimal,
}

impl EvaluationPolicy {
    pub fn new(warning_threshold: Decimal, balance_floor: Decimal) -> Result<Self, EvaluationError> {
        let policy = Self {
            warning_threshold,
            balance_floor,
        };
        policy.validate()?;
        Ok(policy)
    }

    fn validate(&self) -> Result<(), EvaluationError> {
        if self.warning_threshold <= Decimal::ZERO || self.warning_threshold > Decimal::ONE {
            return Err(EvaluationError::invalid(
                "warning_threshold",
                format!("{} must be in (0, 1]", self.warning_threshold),
            ));
        }
        if self.balance_floor < Decimal::ZERO {
            return Err(EvaluationError::invalid(
                "balance_floor",
                format!("{} must not be negative", self.balance_floor),
            ));
        }
        Ok(())
    }
}

impl Default for EvaluationPolicy {
    fn default() -> Self {
        Self {
            warning_threshold: dec!(0.90),
            balance_floor: Decimal::ZERO,
        }
    }
}
