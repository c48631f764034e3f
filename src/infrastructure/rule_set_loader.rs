//! Rule set files
//!
//! Firms are described in TOML, one `[[rule_set]]` table per program:
//!
//! ```toml
//! [[rule_set]]
//! firm = "Acme Funding"
//! program = "100K"
//! drawdown_mode = "trailing"
//! min_trading_days = 5
//! profit_target = { type = "percent", value = 0.08 }
//! max_daily_loss = { type = "absolute", value = 5000 }
//! max_drawdown = { type = "percent", value = 0.10 }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use crate::domain::rules::RuleSet;

#[derive(Debug, Deserialize)]
struct RuleSetFile {
    #[serde(default, rename = "rule_set")]
    rule_sets: Vec<RuleSet>,
}

/// Parse rule sets from TOML text, validating each one
pub fn parse_rule_sets(content: &str) -> Result<Vec<RuleSet>> {
    let file: RuleSetFile = toml::from_str(content).context("Failed to parse rule set TOML")?;

    for rules in &file.rule_sets {
        rules
            .validate()
            .with_context(|| format!("Invalid rule set {}", rules.display_name()))?;
    }

    if file.rule_sets.is_empty() {
        warn!("Rule set file contains no [[rule_set]] tables");
    }
    Ok(file.rule_sets)
}

/// Load rule sets from a TOML file
pub fn load_rule_sets(path: impl AsRef<Path>) -> Result<Vec<RuleSet>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read rule set file: {}", path.display()))?;
    let rule_sets = parse_rule_sets(&content)
        .context(format!("Failed to load rule sets from {}", path.display()))?;
    info!("Loaded {} rule set(s) from {}", rule_sets.len(), path.display());
    Ok(rule_sets)
}

/// Find a rule set by display name, ignoring case
pub fn find_rule_set<'a>(rule_sets: &'a [RuleSet], name: &str) -> Option<&'a RuleSet> {
    rule_sets
        .iter()
        .find(|rules| rules.display_name().eq_ignore_ascii_case(name) || rules.firm.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::{DrawdownMode, Limit};
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"
        [[rule_set]]
        firm = "Acme Funding"
        program = "100K"
        drawdown_mode = "trailing"
        min_trading_days = 5
        profit_target = { type = "percent", value = 0.08 }
        max_daily_loss = { type = "absolute", value = 5000 }
        max_drawdown = { type = "percent", value = 0.10 }

        [[rule_set]]
        firm = "Static Capital"
        max_daily_loss = { type = "percent", value = "0.04" }
        max_drawdown = { type = "percent", value = "0.08" }
        consistency = { max_best_day_share = 0.4 }
    "#;

    #[test]
    fn test_parse_sample() {
        let rule_sets = parse_rule_sets(SAMPLE).unwrap();
        assert_eq!(rule_sets.len(), 2);

        let acme = &rule_sets[0];
        assert_eq!(acme.drawdown_mode, DrawdownMode::Trailing);
        assert_eq!(acme.max_daily_loss, Some(Limit::Absolute(dec!(5000))));
        assert_eq!(acme.profit_target, Some(Limit::Percent(dec!(0.08))));

        let fixed = &rule_sets[1];
        assert_eq!(fixed.drawdown_mode, DrawdownMode::Static);
        assert_eq!(fixed.min_trading_days, 0);
        assert_eq!(fixed.consistency.map(|c| c.max_best_day_share), Some(dec!(0.4)));
    }

    #[test]
    fn test_missing_threshold_fails_load() {
        let content = r#"
            [[rule_set]]
            firm = "Half Done"
            max_daily_loss = { type = "percent", value = 0.05 }
        "#;

        let err = parse_rule_sets(content).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("Half Done"));
        assert!(msg.contains("max_drawdown"));
    }

    #[test]
    fn test_find_rule_set() {
        let rule_sets = parse_rule_sets(SAMPLE).unwrap();
        assert!(find_rule_set(&rule_sets, "acme funding 100k").is_some());
        assert!(find_rule_set(&rule_sets, "static capital").is_some());
        assert!(find_rule_set(&rule_sets, "nobody").is_none());
    }

    #[test]
    fn test_bundled_file_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/rulesets/firms.toml");
        let rule_sets = load_rule_sets(path).unwrap();
        assert!(!rule_sets.is_empty());
    }
}
