//! Rule Evaluation Engine
//!
//! Pure classification of an account snapshot against a firm rule set.
//! Nothing here mutates its inputs or touches shared state: the same
//! `(account, rules)` pair always yields the same `EvaluationResult`.
//!
//! # Classification
//!
//! Ordered, first match wins:
//! 1. any limit breached -> `VIOLATION`
//! 2. any limit inside the warning buffer -> `WARNING`
//! 3. profit target met and every other objective met -> `PASSED`
//! 4. otherwise -> `SAFE`

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::account::AccountState;
use crate::domain::errors::EvaluationError;
use crate::domain::evaluation::checks::{EvaluationContext, RuleCheck, default_checks};
use crate::domain::evaluation::policy::EvaluationPolicy;
use crate::domain::evaluation::types::{
    AccountMetrics, EvaluationResult, HealthStatus, RuleKind, RuleOutcome, RuleVerdict,
    SimulationResult,
};
use crate::domain::rules::{DrawdownMode, RuleSet};

/// Derive profit, daily loss and drawdown from the snapshot
///
/// The drawdown baseline is chosen here, once, from `rules.drawdown_mode`.
pub fn compute_metrics(account: &AccountState, rules: &RuleSet) -> AccountMetrics {
    let drawdown_baseline = match rules.drawdown_mode {
        DrawdownMode::Trailing => account.highest_balance,
        DrawdownMode::Static => account.starting_balance,
    };

    AccountMetrics {
        profit: account.current_balance - account.starting_balance,
        daily_loss: (account.daily_starting_balance - account.current_balance).max(Decimal::ZERO),
        drawdown: (drawdown_baseline - account.current_balance).max(Decimal::ZERO),
        drawdown_baseline,
    }
}

/// Runs rule checks in priority order and classifies the result
pub struct HealthEngine {
    policy: EvaluationPolicy,
    checks: Vec<Box<dyn RuleCheck>>,
}

impl HealthEngine {
    /// Create an engine with the standard checks
    pub fn new(policy: EvaluationPolicy) -> Self {
        Self::with_checks(policy, default_checks())
    }

    /// Create an engine with custom checks, sorted by priority
    ///
    /// One check per rule kind: a later check for a kind already covered is
    /// dropped.
    pub fn with_checks(policy: EvaluationPolicy, checks: Vec<Box<dyn RuleCheck>>) -> Self {
        let mut sorted_checks: Vec<Box<dyn RuleCheck>> = Vec::with_capacity(checks.len());
        for check in checks {
            if sorted_checks.iter().any(|c| c.kind() == check.kind()) {
                warn!(
                    "Dropping {}: {} is already graded",
                    check.name(),
                    check.kind()
                );
                continue;
            }
            sorted_checks.push(check);
        }
        sorted_checks.sort_by_key(|c| c.priority());
        Self {
            policy,
            checks: sorted_checks,
        }
    }

    pub fn policy(&self) -> &EvaluationPolicy {
        &self.policy
    }

    /// Check names in execution order
    pub fn list_checks(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Classify the account's health
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when the rule set or account is malformed
    /// - `ComputationImpossible` when the starting balance is not positive
    pub fn evaluate(
        &self,
        account: &AccountState,
        rules: &RuleSet,
    ) -> Result<EvaluationResult, EvaluationError> {
        rules.validate()?;
        account.validate()?;

        if account.highest_balance < account.current_balance {
            debug!(
                "Highest balance {} below current balance {}; drawdown floored at zero",
                account.highest_balance, account.current_balance
            );
        }

        let metrics = compute_metrics(account, rules);
        let ctx = EvaluationContext::new(account, rules, &self.policy, &metrics);

        let outcomes: Vec<RuleOutcome> = self
            .checks
            .iter()
            .filter_map(|check| {
                let outcome = check.evaluate(&ctx)?;
                debug_assert_eq!(
                    outcome.rule,
                    check.kind(),
                    "{} graded the wrong rule",
                    check.name()
                );
                Some(outcome)
            })
            .collect();

        let breached = rules_with(&outcomes, RuleVerdict::Breached);
        let approaching = rules_with(&outcomes, RuleVerdict::Approaching);
        let status = classify(&outcomes, &breached, &approaching);

        debug!(
            "Evaluated {} -> {} (breached: {:?}, approaching: {:?})",
            rules.display_name(),
            status,
            breached,
            approaching
        );

        Ok(EvaluationResult {
            status,
            outcomes,
            breached,
            approaching,
            metrics,
        })
    }

    /// Project the effect of a hypothetical trade without touching `account`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` on `hypothetical_pnl` when a loss takes the projected
    ///   balance below the policy's balance floor, or the projection overflows
    /// - any error `evaluate` returns for the current account
    pub fn simulate(
        &self,
        account: &AccountState,
        rules: &RuleSet,
        hypothetical_pnl: Decimal,
    ) -> Result<SimulationResult, EvaluationError> {
        let baseline = self.evaluate(account, rules)?;

        let projected = account.with_pnl(hypothetical_pnl, "hypothetical_pnl")?;
        // Only a loss can push the balance under the floor; an account already
        // below it still simulates gains and flat trades
        if hypothetical_pnl < Decimal::ZERO
            && projected.current_balance < self.policy.balance_floor
        {
            return Err(EvaluationError::invalid(
                "hypothetical_pnl",
                format!(
                    "{} would take the balance to {}, below the floor of {}",
                    hypothetical_pnl, projected.current_balance, self.policy.balance_floor
                ),
            ));
        }

        let projection = self.evaluate(&projected, rules)?;

        let would_breach = if projection.is_violation() {
            projection.breached.clone()
        } else {
            Vec::new()
        };

        let loss_headroom = projection
            .outcomes
            .iter()
            .filter(|o| o.rule.is_limit())
            .map(|o| o.remaining)
            .min()
            .unwrap_or(Decimal::ZERO);

        Ok(SimulationResult {
            hypothetical_pnl,
            status_changed: baseline.status != projection.status,
            projected,
            baseline,
            projection,
            would_breach,
            loss_headroom,
        })
    }
}

impl Default for HealthEngine {
    fn default() -> Self {
        Self::new(EvaluationPolicy::default())
    }
}

fn rules_with(outcomes: &[RuleOutcome], verdict: RuleVerdict) -> Vec<RuleKind> {
    outcomes
        .iter()
        .filter(|o| o.verdict == verdict)
        .map(|o| o.rule)
        .collect()
}

fn classify(outcomes: &[RuleOutcome], breached: &[RuleKind], approaching: &[RuleKind]) -> HealthStatus {
    if !breached.is_empty() {
        return HealthStatus::Violation;
    }
    if !approaching.is_empty() {
        return HealthStatus::Warning;
    }

    let target_met = outcomes
        .iter()
        .any(|o| o.rule == RuleKind::ProfitTarget && o.verdict == RuleVerdict::Met);
    let objectives_met = outcomes
        .iter()
        .filter(|o| !o.rule.is_limit())
        .all(|o| o.verdict == RuleVerdict::Met);

    if target_met && objectives_met {
        HealthStatus::Passed
    } else {
        HealthStatus::Safe
    }
}

/// Evaluate with the default policy
pub fn evaluate_health(
    account: &AccountState,
    rules: &RuleSet,
) -> Result<EvaluationResult, EvaluationError> {
    HealthEngine::default().evaluate(account, rules)
}

/// Simulate with the default policy
pub fn simulate_trade(
    account: &AccountState,
    rules: &RuleSet,
    hypothetical_pnl: Decimal,
) -> Result<SimulationResult, EvaluationError> {
    HealthEngine::default().simulate(account, rules, hypothetical_pnl)
}
