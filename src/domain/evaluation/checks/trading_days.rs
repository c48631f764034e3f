use rust_decimal::Decimal;

use crate::domain::evaluation::checks::check_trait::{EvaluationContext, RuleCheck};
use crate::domain::evaluation::types::{RuleKind, RuleOutcome};

/// Minimum number of days with at least one trade
pub struct MinTradingDaysCheck;

impl RuleCheck for MinTradingDaysCheck {
    fn name(&self) -> &str {
        "MinTradingDaysCheck"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::MinTradingDays
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Option<RuleOutcome> {
        if ctx.rules.min_trading_days == 0 {
            return None;
        }
        Some(ctx.grade_objective(
            RuleKind::MinTradingDays,
            Decimal::from(ctx.account.trading_days),
            Decimal::from(ctx.rules.min_trading_days),
        ))
    }

    fn priority(&self) -> u8 {
        20
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

    fn rules(days: u32) -> RuleSet {
        RuleSet::new(
            "Test",
            Limit::Percent(dec!(0.05)),
            Limit::Percent(dec!(0.10)),
            DrawdownMode::Static,
        )
        .with_min_trading_days(days)
    }

    #[test]
    fn test_pending_until_enough_days() {
        let mut account = AccountState::new(dec!(100000));
        account.trading_days = 3;

        let outcome = run_check(&MinTradingDaysCheck, &account, &rules(4)).unwrap();
        assert_eq!(outcome.verdict, RuleVerdict::Pending);
        assert_eq!(outcome.remaining, dec!(1));

        account.trading_days = 4;
        let outcome = run_check(&MinTradingDaysCheck, &account, &rules(4)).unwrap();
        assert_eq!(outcome.verdict, RuleVerdict::Met);
    }

    #[test]
    fn test_skipped_without_minimum() {
        let account = AccountState::new(dec!(100000));
        assert!(run_check(&MinTradingDaysCheck, &account, &rules(0)).is_none());
    }
}
