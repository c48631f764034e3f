use crate::domain::evaluation::checks::check_trait::{EvaluationContext, RuleCheck};
use crate::domain::evaluation::types::{RuleKind, RuleOutcome};

/// Profit over the starting balance against the firm's target
pub struct ProfitTargetCheck;

impl RuleCheck for ProfitTargetCheck {
    fn name(&self) -> &str {
        "ProfitTargetCheck"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::ProfitTarget
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Option<RuleOutcome> {
        let target = ctx.rules.profit_target?.resolve(ctx.account_size());
        Some(ctx.grade_objective(RuleKind::ProfitTarget, ctx.metrics.profit, target))
    }

    fn priority(&self) -> u8 {
        10
    }
}
