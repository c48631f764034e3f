//! Firm Rule Set Value Object
//!
//! A `RuleSet` describes the limits and objectives a prop firm applies to a
//! challenge account. It is created from firm metadata and never mutated
//! during evaluation.
//!
//! # Conventions
//!
//! - Percentages are fractions of the account size: `0.05` = 5%
//! - Absolute limits are money amounts in account currency
//! - `max_daily_loss` and `max_drawdown` are required; `profit_target` is
//!   optional (funded accounts have none)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::EvaluationError;

/// A threshold expressed either relative to the account size or in money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Limit {
    /// Fraction of the account size (e.g., 0.10 = 10%)
    Percent(Decimal),
    /// Fixed amount in account currency
    Absolute(Decimal),
}

impl Limit {
    /// Money amount of this limit for an account of the given size
    pub fn resolve(&self, account_size: Decimal) -> Decimal {
        match self {
            Limit::Percent(pct) => account_size * pct,
            Limit::Absolute(amount) => *amount,
        }
    }

    fn validate(&self, field: &str) -> Result<(), EvaluationError> {
        match self {
            Limit::Percent(pct) => {
                if *pct <= Decimal::ZERO || *pct > Decimal::ONE {
                    return Err(EvaluationError::invalid(
                        field,
                        format!("percentage {} must be in (0, 1]", pct),
                    ));
                }
            }
            Limit::Absolute(amount) => {
                if *amount <= Decimal::ZERO {
                    return Err(EvaluationError::invalid(
                        field,
                        format!("amount {} must be positive", amount),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Percent(pct) => write!(f, "{}%", (pct * Decimal::ONE_HUNDRED).normalize()),
            Limit::Absolute(amount) => write!(f, "${}", amount.normalize()),
        }
    }
}

/// Which baseline the overall drawdown is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawdownMode {
    /// Measured from the starting balance, forever
    #[default]
    Static,
    /// Measured from the highest balance reached
    Trailing,
}

/// No single day's profit may exceed this share of the total profit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyRule {
    /// Fraction of total profit (e.g., 0.30 = 30%)
    pub max_best_day_share: Decimal,
}

/// Immutable rule configuration for one firm program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub firm: String,
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub profit_target: Option<Limit>,
    #[serde(default)]
    pub max_daily_loss: Option<Limit>,
    #[serde(default)]
    pub max_drawdown: Option<Limit>,
    #[serde(default)]
    pub drawdown_mode: DrawdownMode,
    #[serde(default)]
    pub min_trading_days: u32,
    #[serde(default)]
    pub consistency: Option<ConsistencyRule>,
}

impl RuleSet {
    /// Start a rule set with the two required loss limits
    pub fn new(
        firm: impl Into<String>,
        max_daily_loss: Limit,
        max_drawdown: Limit,
        drawdown_mode: DrawdownMode,
    ) -> Self {
        Self {
            firm: firm.into(),
            program: String::new(),
            profit_target: None,
            max_daily_loss: Some(max_daily_loss),
            max_drawdown: Some(max_drawdown),
            drawdown_mode,
            min_trading_days: 0,
            consistency: None,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_profit_target(mut self, target: Limit) -> Self {
        self.profit_target = Some(target);
        self
    }

    pub fn with_min_trading_days(mut self, days: u32) -> Self {
        self.min_trading_days = days;
        self
    }

    pub fn with_consistency(mut self, max_best_day_share: Decimal) -> Self {
        self.consistency = Some(ConsistencyRule { max_best_day_share });
        self
    }

    /// Display name, e.g. "TopStep 50K"
    pub fn display_name(&self) -> String {
        if self.program.is_empty() {
            self.firm.clone()
        } else {
            format!("{} {}", self.firm, self.program)
        }
    }

    /// Validate that every required threshold is present and sane
    ///
    /// # Errors
    ///
    /// Returns `EvaluationError::InvalidInput` naming the first offending field
    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.firm.trim().is_empty() {
            return Err(EvaluationError::invalid("firm", "must not be empty"));
        }

        match &self.max_daily_loss {
            Some(limit) => limit.validate("max_daily_loss")?,
            None => return Err(EvaluationError::invalid("max_daily_loss", "is required")),
        }

        match &self.max_drawdown {
            Some(limit) => limit.validate("max_drawdown")?,
            None => return Err(EvaluationError::invalid("max_drawdown", "is required")),
        }

        if let Some(target) = &self.profit_target {
            target.validate("profit_target")?;
        }

        if let Some(rule) = &self.consistency
            && (rule.max_best_day_share <= Decimal::ZERO || rule.max_best_day_share > Decimal::ONE)
        {
            return Err(EvaluationError::invalid(
                "consistency.max_best_day_share",
                format!("share {} must be in (0, 1]", rule.max_best_day_share),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_rules() -> RuleSet {
        RuleSet::new(
            "Acme Funding",
            Limit::Percent(dec!(0.05)),
            Limit::Percent(dec!(0.10)),
            DrawdownMode::Static,
        )
    }

    #[test]
    fn test_percent_limit_resolves_against_account_size() {
        assert_eq!(Limit::Percent(dec!(0.05)).resolve(dec!(100000)), dec!(5000));
        assert_eq!(Limit::Absolute(dec!(2000)).resolve(dec!(100000)), dec!(2000));
    }

    #[test]
    fn test_limit_display() {
        assert_eq!(Limit::Percent(dec!(0.05)).to_string(), "5%");
        assert_eq!(Limit::Absolute(dec!(2000.00)).to_string(), "$2000");
    }

    #[test]
    fn test_valid_rule_set() {
        let rules = base_rules()
            .with_profit_target(Limit::Percent(dec!(0.08)))
            .with_min_trading_days(4)
            .with_consistency(dec!(0.30));
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_missing_drawdown_is_rejected() {
        let mut rules = base_rules();
        rules.max_drawdown = None;

        let err = rules.validate().unwrap_err();
        assert_eq!(err.field(), Some("max_drawdown"));
    }

    #[test]
    fn test_missing_daily_loss_is_rejected() {
        let mut rules = base_rules();
        rules.max_daily_loss = None;

        let err = rules.validate().unwrap_err();
        assert_eq!(err.field(), Some("max_daily_loss"));
    }

    #[test]
    fn test_out_of_range_percentage_is_rejected() {
        let mut rules = base_rules();
        rules.max_daily_loss = Some(Limit::Percent(dec!(1.5)));
        assert_eq!(rules.validate().unwrap_err().field(), Some("max_daily_loss"));

        rules.max_daily_loss = Some(Limit::Percent(Decimal::ZERO));
        assert_eq!(rules.validate().unwrap_err().field(), Some("max_daily_loss"));
    }

    #[test]
    fn test_negative_absolute_target_is_rejected() {
        let rules = base_rules().with_profit_target(Limit::Absolute(dec!(-10)));
        assert_eq!(rules.validate().unwrap_err().field(), Some("profit_target"));
    }

    #[test]
    fn test_consistency_share_bounds() {
        let rules = base_rules().with_consistency(dec!(1.2));
        assert_eq!(
            rules.validate().unwrap_err().field(),
            Some("consistency.max_best_day_share")
        );
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{
            "firm": "Acme Funding",
            "program": "100K",
            "profit_target": { "type": "percent", "value": "0.08" },
            "max_daily_loss": { "type": "absolute", "value": "5000" },
            "max_drawdown": { "type": "percent", "value": "0.10" },
            "drawdown_mode": "trailing",
            "min_trading_days": 5
        }"#;

        let rules: RuleSet = serde_json::from_str(json).unwrap();
        assert_eq!(rules.drawdown_mode, DrawdownMode::Trailing);
        assert_eq!(rules.max_daily_loss, Some(Limit::Absolute(dec!(5000))));
        assert_eq!(rules.consistency, None);
        assert_eq!(rules.display_name(), "Acme Funding 100K");
    }
}
