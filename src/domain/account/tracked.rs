use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::state::AccountState;
use crate::domain::evaluation::types::HealthStatus;
use crate::domain::rules::RuleSet;

/// A challenge account a user follows on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedAccount {
    pub id: Uuid,
    pub label: String,
    pub rule_set: RuleSet,
    pub state: AccountState,
    /// Classification from the last evaluation, if any
    pub last_status: Option<HealthStatus>,
}

impl TrackedAccount {
    pub fn new(label: impl Into<String>, rule_set: RuleSet, state: AccountState) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            rule_set,
            state,
            last_status: None,
        }
    }
}
