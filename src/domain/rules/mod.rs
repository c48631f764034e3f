// Firm rule sets
pub mod presets;
pub mod rule_set;

pub use rule_set::{ConsistencyRule, DrawdownMode, Limit, RuleSet};
