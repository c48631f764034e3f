use tracing::debug;

use crate::domain::evaluation::checks::check_trait::{EvaluationContext, RuleCheck};
use crate::domain::evaluation::types::{RuleKind, RuleOutcome};

/// Loss within the current trading day, measured from the daily starting balance
pub struct DailyLossCheck;

impl RuleCheck for DailyLossCheck {
    fn name(&self) -> &str {
        "DailyLossCheck"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::DailyLoss
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Option<RuleOutcome> {
        let limit = ctx.rules.max_daily_loss?;
        let threshold = limit.resolve(ctx.account_size());
        let outcome = ctx.grade_limit(RuleKind::DailyLoss, ctx.metrics.daily_loss, threshold);

        debug!(
            "Daily loss {} of {} ({}) -> {:?}",
            ctx.metrics.daily_loss, threshold, limit, outcome.verdict
        );
        Some(outcome)
    }

    fn priority(&self) -> u8 {
        1 // Day-level breach is the most common failure
    }
}
