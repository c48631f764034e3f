use tracing::debug;

use crate::domain::evaluation::checks::check_trait::{EvaluationContext, RuleCheck};
use crate::domain::evaluation::types::{RuleKind, RuleOutcome};

/// Overall drawdown, measured from the baseline chosen by the rule set
///
/// The baseline itself is picked once in `AccountMetrics` so that static and
/// trailing modes can never be mixed inside one evaluation.
pub struct MaxDrawdownCheck;

impl RuleCheck for MaxDrawdownCheck {
    fn name(&self) -> &str {
        "MaxDrawdownCheck"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::MaxDrawdown
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Option<RuleOutcome> {
        let limit = ctx.rules.max_drawdown?;
        let threshold = limit.resolve(ctx.account_size());
        let outcome = ctx.grade_limit(RuleKind::MaxDrawdown, ctx.metrics.drawdown, threshold);

        debug!(
            "{:?} drawdown {} from {} of {} ({}) -> {:?}",
            ctx.rules.drawdown_mode,
            ctx.metrics.drawdown,
            ctx.metrics.drawdown_baseline,
            threshold,
            limit,
            outcome.verdict
        );
        Some(outcome)
    }

    fn priority(&self) -> u8 {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountState;
    use crate::domain::evaluation::checks::test_support::run_check;
    use crate::domain::evaluation::types::RuleVerdict;
    use crate::domain::rules::{DrawdownMode, Limit, RuleSet};
    use rust_decimal_macros::dec;

    fn rules(mode: DrawdownMode) -> RuleSet {
        RuleSet::new(
            "Test",
            Limit::Percent(dec!(0.05)),
            Limit::Percent(dec!(0.10)),
            mode,
        )
    }

    fn account(current: rust_decimal::Decimal, highest: rust_decimal::Decimal) -> AccountState {
        let mut account = AccountState::new(dec!(100000));
        account.current_balance = current;
        account.highest_balance = highest;
        account.daily_starting_balance = current;
        account
    }

    #[test]
    fn test_trailing_measures_from_peak() {
        let account = account(dec!(99500), dec!(110000));
        let outcome = run_check(&MaxDrawdownCheck, &account, &rules(DrawdownMode::Trailing)).unwrap();

        assert_eq!(outcome.current, dec!(10500));
        assert_eq!(outcome.verdict, RuleVerdict::Breached);
    }

    #[test]
    fn test_static_ignores_peak() {
        let account = account(dec!(92000), dec!(115000));
        let outcome = run_check(&MaxDrawdownCheck, &account, &rules(DrawdownMode::Static)).unwrap();

        assert_eq!(outcome.current, dec!(8000));
        assert_eq!(outcome.verdict, RuleVerdict::Clear);
        assert_eq!(outcome.remaining, dec!(2000));
    }

    #[test]
    fn test_peak_below_current_never_goes_negative() {
        // Caller bug: highest balance lags current balance
        let account = account(dec!(105000), dec!(101000));
        let outcome = run_check(&MaxDrawdownCheck, &account, &rules(DrawdownMode::Trailing)).unwrap();

        assert_eq!(outcome.current, dec!(0));
        assert_eq!(outcome.verdict, RuleVerdict::Clear);
    }
}
