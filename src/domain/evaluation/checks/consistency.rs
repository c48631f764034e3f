use rust_decimal::Decimal;

use crate::domain::evaluation::checks::check_trait::{EvaluationContext, RuleCheck};
use crate::domain::evaluation::types::{RuleKind, RuleOutcome, RuleVerdict};

/// No single day may account for more than a set share of total profit
///
/// Graded as an objective: an inconsistent account is not failed, it simply
/// cannot pass until other days dilute the best one.
pub struct ConsistencyCheck;

impl RuleCheck for ConsistencyCheck {
    fn name(&self) -> &str {
        "ConsistencyCheck"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Consistency
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Option<RuleOutcome> {
        let rule = ctx.rules.consistency?;
        let profit = ctx.metrics.profit;

        // Without profit there is no share to measure yet
        if profit <= Decimal::ZERO {
            return Some(RuleOutcome::new(
                RuleKind::Consistency,
                RuleVerdict::Pending,
                Decimal::ZERO,
                rule.max_best_day_share,
            ));
        }

        // Today's running profit counts even before it is folded into the record
        let best_day = ctx.account.best_day_profit.max(ctx.account.day_profit());
        // A share too large to represent is simply not met
        let share = best_day
            .checked_div(profit)
            .map(|share| share.round_dp(4))
            .unwrap_or(Decimal::MAX);
        let verdict = if share <= rule.max_best_day_share {
            RuleVerdict::Met
        } else {
            RuleVerdict::Pending
        };
        Some(RuleOutcome::new(
            RuleKind::Consistency,
            verdict,
            share,
            rule.max_best_day_share,
        ))
    }

    fn priority(&self) -> u8 {
        30
    }
}
