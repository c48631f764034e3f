use propguard::domain::account::AccountState;
use propguard::domain::errors::EvaluationError;
use propguard::domain::evaluation::{
    EvaluationPolicy, HealthEngine, HealthStatus, RuleKind, RuleVerdict, evaluate_health,
    simulate_trade,
};
use propguard::domain::rules::{DrawdownMode, Limit, RuleSet, presets};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn account(starting: Decimal, current: Decimal, highest: Decimal, daily_start: Decimal) -> AccountState {
    let mut state = AccountState::new(starting);
    state.current_balance = current;
    state.highest_balance = highest;
    state.daily_starting_balance = daily_start;
    state
}

fn percent_rules(mode: DrawdownMode) -> RuleSet {
    RuleSet::new(
        "Scenario Firm",
        Limit::Percent(dec!(0.05)),
        Limit::Percent(dec!(0.10)),
        mode,
    )
}

#[test]
fn test_daily_loss_over_limit_is_violation() {
    let state = account(dec!(100000), dec!(94000), dec!(100000), dec!(100000));
    let result = evaluate_health(&state, &percent_rules(DrawdownMode::Static)).unwrap();

    assert_eq!(result.status, HealthStatus::Violation);
    assert_eq!(result.metrics.daily_loss, dec!(6000));
    assert!(result.breached.contains(&RuleKind::DailyLoss));

    let daily = result.outcome(RuleKind::DailyLoss).unwrap();
    assert_eq!(daily.threshold, dec!(5000));
    assert_eq!(daily.verdict, RuleVerdict::Breached);
}

#[test]
fn test_trailing_drawdown_from_peak_is_violation() {
    let state = account(dec!(100000), dec!(99500), dec!(110000), dec!(99500));
    let result = evaluate_health(&state, &percent_rules(DrawdownMode::Trailing)).unwrap();

    assert_eq!(result.status, HealthStatus::Violation);
    assert_eq!(result.metrics.drawdown, dec!(10500));
    assert_eq!(result.metrics.drawdown_baseline, dec!(110000));
    assert_eq!(result.breached, vec![RuleKind::MaxDrawdown]);
}

#[test]
fn test_static_drawdown_ignores_peak() {
    let state = account(dec!(100000), dec!(92000), dec!(115000), dec!(92000));
    let result = evaluate_health(&state, &percent_rules(DrawdownMode::Static)).unwrap();

    assert_eq!(result.metrics.drawdown, dec!(8000));
    assert_eq!(result.metrics.drawdown_baseline, dec!(100000));
    assert_eq!(result.status, HealthStatus::Safe);
    assert!(result.breached.is_empty());
}

#[test]
fn test_profit_target_with_days_is_passed() {
    let mut state = account(dec!(100000), dec!(108500), dec!(108500), dec!(108000));
    state.trading_days = 4;

    let result = evaluate_health(&state, &presets::two_step_phase_one()).unwrap();

    assert_eq!(result.status, HealthStatus::Passed);
    assert_eq!(result.metrics.profit, dec!(8500));
    assert_eq!(
        result.outcome(RuleKind::ProfitTarget).unwrap().verdict,
        RuleVerdict::Met
    );
}

#[test]
fn test_profit_target_without_days_stays_safe() {
    let mut state = account(dec!(100000), dec!(108500), dec!(108500), dec!(108000));
    state.trading_days = 2;

    let result = evaluate_health(&state, &presets::two_step_phase_one()).unwrap();

    assert_eq!(result.status, HealthStatus::Safe);
    assert_eq!(
        result.outcome(RuleKind::MinTradingDays).unwrap().verdict,
        RuleVerdict::Pending
    );
}

#[test]
fn test_evaluation_is_deterministic() {
    let engine = HealthEngine::default();
    let rules = presets::topstep_50k();
    let state = account(dec!(50000), dec!(48700), dec!(51200), dec!(49500));

    let first = engine.evaluate(&state, &rules).unwrap();
    for _ in 0..10 {
        assert_eq!(engine.evaluate(&state, &rules).unwrap(), first);
    }
}

#[test]
fn test_zero_trade_simulation_matches_evaluation() {
    let cases = vec![
        account(dec!(100000), dec!(94000), dec!(100000), dec!(100000)),
        account(dec!(100000), dec!(92000), dec!(115000), dec!(92000)),
        account(dec!(100000), dec!(101000), dec!(103000), dec!(100500)),
    ];
    // The raised floor sits above the first two balances
    let engines = vec![
        HealthEngine::default(),
        HealthEngine::new(EvaluationPolicy::new(dec!(0.90), dec!(95000)).unwrap()),
    ];

    for engine in &engines {
        for rules in presets::all() {
            for state in &cases {
                let evaluation = engine.evaluate(state, &rules).unwrap();
                let simulation = engine.simulate(state, &rules, Decimal::ZERO).unwrap();

                assert_eq!(simulation.projection.status, evaluation.status);
                assert!(!simulation.status_changed);
                assert_eq!(simulation.projected.current_balance, state.current_balance);
            }
        }
    }
}

#[test]
fn test_inconsistent_peak_never_gives_negative_drawdown() {
    // Peak below current balance is a caller bug; drawdown still bottoms out at zero
    let state = account(dec!(100000), dec!(104000), dec!(101000), dec!(104000));
    let result = evaluate_health(&state, &percent_rules(DrawdownMode::Trailing)).unwrap();

    assert_eq!(result.metrics.drawdown, Decimal::ZERO);
    assert_eq!(result.status, HealthStatus::Safe);
}

#[test]
fn test_simulation_names_the_rule_that_would_break() {
    let state = account(dec!(100000), dec!(99000), dec!(100000), dec!(100000));
    let result = simulate_trade(&state, &percent_rules(DrawdownMode::Static), dec!(-4500)).unwrap();

    assert_eq!(result.baseline.status, HealthStatus::Safe);
    assert_eq!(result.projection.status, HealthStatus::Violation);
    assert_eq!(result.would_breach, vec![RuleKind::DailyLoss]);
    assert!(result.status_changed);
    // Original snapshot untouched
    assert_eq!(state.current_balance, dec!(99000));
}

#[test]
fn test_simulation_reports_headroom_when_safe() {
    let state = AccountState::new(dec!(100000));
    let result = simulate_trade(&state, &percent_rules(DrawdownMode::Static), dec!(-1000)).unwrap();

    assert!(result.would_breach.is_empty());
    assert_eq!(result.loss_headroom, dec!(4000));
    let daily = result.projection.outcome(RuleKind::DailyLoss).unwrap();
    assert_eq!(daily.remaining, dec!(4000));
}

#[test]
fn test_missing_threshold_is_invalid_input() {
    let mut rules = percent_rules(DrawdownMode::Static);
    rules.max_drawdown = None;

    let err = evaluate_health(&AccountState::new(dec!(100000)), &rules).unwrap_err();
    assert_eq!(err.field(), Some("max_drawdown"));

    let err = simulate_trade(&AccountState::new(dec!(100000)), &rules, dec!(-10)).unwrap_err();
    assert!(matches!(err, EvaluationError::InvalidInput { .. }));
}

#[test]
fn test_non_positive_starting_balance_is_impossible() {
    let state = AccountState::new(Decimal::ZERO);
    let err = evaluate_health(&state, &percent_rules(DrawdownMode::Static)).unwrap_err();
    assert!(matches!(err, EvaluationError::ComputationImpossible { .. }));
}

#[test]
fn test_trade_below_floor_is_invalid_input() {
    let state = AccountState::new(dec!(100000));
    let err = simulate_trade(&state, &percent_rules(DrawdownMode::Static), dec!(-100001)).unwrap_err();
    assert_eq!(err.field(), Some("hypothetical_pnl"));
}

#[test]
fn test_extreme_values_come_back_as_errors_or_results() {
    let rules = percent_rules(DrawdownMode::Static).with_consistency(dec!(0.30));

    let err = simulate_trade(&AccountState::new(dec!(100000)), &rules, Decimal::MAX).unwrap_err();
    assert_eq!(err.field(), Some("hypothetical_pnl"));

    let mut state = account(
        dec!(100000),
        dec!(100000.0000000001),
        dec!(100000.0000000001),
        dec!(100000.0000000001),
    );
    state.best_day_profit = dec!(100000000000000000000);
    let result = evaluate_health(&state, &rules).unwrap();
    assert_eq!(
        result.outcome(RuleKind::Consistency).unwrap().verdict,
        RuleVerdict::Pending
    );
}
