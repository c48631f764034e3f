use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::account::AccountState;

/// Overall classification of an account
///
/// Ordered by precedence: the first matching status wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    /// At least one limit is breached; the challenge is failed
    Violation,
    /// A limit is within the warning buffer
    Warning,
    /// Profit target and every other objective met
    Passed,
    /// Nothing breached or approached; still in progress
    Safe,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Violation => "VIOLATION",
            HealthStatus::Warning => "WARNING",
            HealthStatus::Passed => "PASSED",
            HealthStatus::Safe => "SAFE",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The firm rules the engine knows how to check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    DailyLoss,
    MaxDrawdown,
    ProfitTarget,
    MinTradingDays,
    Consistency,
}

impl RuleKind {
    /// Loss limits fail the account; the rest are objectives to pass it
    pub fn is_limit(&self) -> bool {
        matches!(self, RuleKind::DailyLoss | RuleKind::MaxDrawdown)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::DailyLoss => "daily loss",
            RuleKind::MaxDrawdown => "max drawdown",
            RuleKind::ProfitTarget => "profit target",
            RuleKind::MinTradingDays => "minimum trading days",
            RuleKind::Consistency => "consistency",
        };
        f.write_str(name)
    }
}

/// Verdict for a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleVerdict {
    // Limits
    Clear,
    Approaching,
    Breached,
    // Objectives
    Met,
    Pending,
}

/// Result of checking one rule against an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: RuleKind,
    pub verdict: RuleVerdict,
    /// Amount used (loss, drawdown) or achieved (profit, days, best-day share)
    pub current: Decimal,
    /// Resolved threshold
    pub threshold: Decimal,
    /// `threshold - current`, floored at zero
    pub remaining: Decimal,
    /// `current / threshold`, floored at zero
    pub utilization: Decimal,
}

impl RuleOutcome {
    pub fn new(rule: RuleKind, verdict: RuleVerdict, current: Decimal, threshold: Decimal) -> Self {
        let remaining = threshold
            .checked_sub(current)
            .unwrap_or(Decimal::MAX)
            .max(Decimal::ZERO);
        let utilization = current
            .checked_div(threshold)
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO);
        Self {
            rule,
            verdict,
            current,
            threshold,
            remaining,
            utilization,
        }
    }
}

/// Raw numbers derived from the account before any rule is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMetrics {
    /// `current - starting`, may be negative
    pub profit: Decimal,
    /// `daily_start - current`, floored at zero
    pub daily_loss: Decimal,
    /// `baseline - current`, floored at zero
    pub drawdown: Decimal,
    /// Balance the drawdown is measured from
    pub drawdown_baseline: Decimal,
}

/// Health verdict for one account against one rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub status: HealthStatus,
    /// Outcomes of every configured rule, in check priority order
    pub outcomes: Vec<RuleOutcome>,
    pub breached: Vec<RuleKind>,
    pub approaching: Vec<RuleKind>,
    pub metrics: AccountMetrics,
}

impl EvaluationResult {
    pub fn outcome(&self, rule: RuleKind) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.rule == rule)
    }

    pub fn is_violation(&self) -> bool {
        self.status == HealthStatus::Violation
    }
}

/// Projected verdict after a hypothetical trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub hypothetical_pnl: Decimal,
    /// Account as it would look after the trade
    pub projected: AccountState,
    /// Verdict for the account as it is now
    pub baseline: EvaluationResult,
    /// Verdict for the projected account
    pub projection: EvaluationResult,
    /// Rules the trade would breach (empty unless the projection is VIOLATION)
    pub would_breach: Vec<RuleKind>,
    pub status_changed: bool,
    /// Further loss the projected account can take before a limit breaks
    pub loss_headroom: Decimal,
}
