pub mod check_trait;
pub mod consistency;
pub mod daily_loss;
pub mod drawdown;
pub mod profit_target;
pub mod trading_days;

pub use check_trait::{EvaluationContext, RuleCheck};
pub use consistency::ConsistencyCheck;
pub use daily_loss::DailyLossCheck;
pub use drawdown::MaxDrawdownCheck;
pub use profit_target::ProfitTargetCheck;
pub use trading_days::MinTradingDaysCheck;

/// The standard set of checks, one per rule kind
pub fn default_checks() -> Vec<Box<dyn RuleCheck>> {
    vec![
        Box::new(DailyLossCheck),
        Box::new(MaxDrawdownCheck),
        Box::new(ProfitTargetCheck),
        Box::new(MinTradingDaysCheck),
        Box::new(ConsistencyCheck),
    ]
}
