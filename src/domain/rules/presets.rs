use rust_decimal_macros::dec;

use super::rule_set::{DrawdownMode, Limit, RuleSet};

/// TopStep 50K Trading Combine.
pub fn topstep_50k() -> RuleSet {
    RuleSet::new(
        "TopStep",
        Limit::Absolute(dec!(1000)),
        Limit::Absolute(dec!(2000)),
        DrawdownMode::Trailing,
    )
    .with_program("50K")
    .with_profit_target(Limit::Absolute(dec!(3000)))
    .with_min_trading_days(2)
}

/// TopStep 100K Trading Combine.
pub fn topstep_100k() -> RuleSet {
    RuleSet::new(
        "TopStep",
        Limit::Absolute(dec!(2000)),
        Limit::Absolute(dec!(3000)),
        DrawdownMode::Trailing,
    )
    .with_program("100K")
    .with_profit_target(Limit::Absolute(dec!(6000)))
    .with_min_trading_days(2)
}

/// TopStep 150K Trading Combine.
pub fn topstep_150k() -> RuleSet {
    RuleSet::new(
        "TopStep",
        Limit::Absolute(dec!(3000)),
        Limit::Absolute(dec!(4500)),
        DrawdownMode::Trailing,
    )
    .with_program("150K")
    .with_profit_target(Limit::Absolute(dec!(9000)))
    .with_min_trading_days(2)
}

/// My Funded Futures 100K evaluation. Carries a 30% consistency rule.
pub fn mffu_100k() -> RuleSet {
    RuleSet::new(
        "MFFU",
        Limit::Absolute(dec!(2000)),
        Limit::Absolute(dec!(3000)),
        DrawdownMode::Trailing,
    )
    .with_program("100K")
    .with_profit_target(Limit::Absolute(dec!(6000)))
    .with_min_trading_days(1)
    .with_consistency(dec!(0.30))
}

/// FundingPips 100K evaluation, static drawdown.
pub fn funding_pips_100k() -> RuleSet {
    RuleSet::new(
        "FundingPips",
        Limit::Absolute(dec!(4000)),
        Limit::Absolute(dec!(8000)),
        DrawdownMode::Static,
    )
    .with_program("100K")
    .with_profit_target(Limit::Percent(dec!(0.08)))
    .with_min_trading_days(3)
}

/// Percentage-based two-step challenge, phase one.
pub fn two_step_phase_one() -> RuleSet {
    RuleSet::new(
        "Two-Step",
        Limit::Percent(dec!(0.05)),
        Limit::Percent(dec!(0.10)),
        DrawdownMode::Static,
    )
    .with_program("Phase 1")
    .with_profit_target(Limit::Percent(dec!(0.08)))
    .with_min_trading_days(4)
}

/// Funded stage: no profit target, only loss limits.
pub fn two_step_funded() -> RuleSet {
    RuleSet::new(
        "Two-Step",
        Limit::Percent(dec!(0.05)),
        Limit::Percent(dec!(0.10)),
        DrawdownMode::Static,
    )
    .with_program("Funded")
}

/// Every built-in preset.
pub fn all() -> Vec<RuleSet> {
    vec![
        topstep_50k(),
        topstep_100k(),
        topstep_150k(),
        mffu_100k(),
        funding_pips_100k(),
        two_step_phase_one(),
        two_step_funded(),
    ]
}

/// Look up a preset by display name, ignoring case and separators
/// (`"topstep-50k"`, `"TopStep 50K"` and `"topstep_50k"` all match).
pub fn find(name: &str) -> Option<RuleSet> {
    let wanted = normalize(name);
    all()
        .into_iter()
        .find(|rules| normalize(&rules.display_name()) == wanted)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
