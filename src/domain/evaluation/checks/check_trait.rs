use rust_decimal::Decimal;

use crate::domain::account::AccountState;
use crate::domain::evaluation::policy::EvaluationPolicy;
use crate::domain::evaluation::types::{AccountMetrics, RuleKind, RuleOutcome, RuleVerdict};
use crate::domain::rules::RuleSet;

/// Context shared across all checks during one evaluation
///
/// Checks read the pre-computed metrics instead of re-deriving balances,
/// so every check sees the same drawdown baseline.
#[derive(Debug)]
pub struct EvaluationContext<'a> {
    pub account: &'a AccountState,
    pub rules: &'a RuleSet,
    pub policy: &'a EvaluationPolicy,
    pub metrics: &'a AccountMetrics,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        account: &'a AccountState,
        rules: &'a RuleSet,
        policy: &'a EvaluationPolicy,
        metrics: &'a AccountMetrics,
    ) -> Self {
        Self {
            account,
            rules,
            policy,
            metrics,
        }
    }

    /// Size percentages resolve against
    pub fn account_size(&self) -> Decimal {
        self.account.starting_balance
    }

    /// Grade a loss limit: breached once reached, approaching inside the buffer
    pub fn grade_limit(&self, rule: RuleKind, used: Decimal, threshold: Decimal) -> RuleOutcome {
        let verdict = if used >= threshold {
            RuleVerdict::Breached
        } else if used >= threshold * self.policy.warning_threshold {
            RuleVerdict::Approaching
        } else {
            RuleVerdict::Clear
        };
        RuleOutcome::new(rule, verdict, used, threshold)
    }

    /// Grade an objective: met once reached
    pub fn grade_objective(
        &self,
        rule: RuleKind,
        achieved: Decimal,
        threshold: Decimal,
    ) -> RuleOutcome {
        let verdict = if achieved >= threshold {
            RuleVerdict::Met
        } else {
            RuleVerdict::Pending
        };
        RuleOutcome::new(rule, verdict, achieved, threshold)
    }
}

/// Trait for all firm rule checks
///
/// Each check grades one rule. The `HealthEngine` runs every enabled check
/// in priority order and classifies the account from the outcomes.
pub trait RuleCheck: Send + Sync {
    /// Unique name for logging and debugging
    fn name(&self) -> &str;

    /// Rule this check grades
    fn kind(&self) -> RuleKind;

    /// Grade the rule, or `None` when the rule set does not configure it
    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Option<RuleOutcome>;

    /// Lower runs earlier. Default: 100
    fn priority(&self) -> u8 {
        100
    }
}
