use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::evaluation::types::{HealthStatus, RuleKind};

/// Notifications emitted when a tracked account changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HealthEvent {
    /// Classification moved after a recorded trade
    StatusChanged {
        account_id: Uuid,
        label: String,
        from: Option<HealthStatus>,
        to: HealthStatus,
        /// Rules breached or approached in the new state
        rules: Vec<RuleKind>,
        timestamp: DateTime<Utc>,
    },
    /// A new account started being tracked
    AccountOpened {
        account_id: Uuid,
        label: String,
        timestamp: DateTime<Utc>,
    },
}

impl HealthEvent {
    pub fn account_id(&self) -> Uuid {
        match self {
            HealthEvent::StatusChanged { account_id, .. } => *account_id,
            HealthEvent::AccountOpened { account_id, .. } => *account_id,
        }
    }
}

/// Receives health events (dashboard badges, notification senders)
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &HealthEvent);
}

/// Writes every event to the log
pub struct LoggingListener;

impl EventListener for LoggingListener {
    fn on_event(&self, event: &HealthEvent) {
        match event {
            HealthEvent::StatusChanged {
                label,
                from,
                to: HealthStatus::Violation,
                rules,
                ..
            } => {
                warn!("Account {} failed ({:?} -> VIOLATION): {:?}", label, from, rules);
            }
            HealthEvent::StatusChanged {
                label, from, to, rules, ..
            } => {
                info!("Account {} status {:?} -> {} {:?}", label, from, to, rules);
            }
            HealthEvent::AccountOpened { label, account_id, .. } => {
                info!("Tracking account {} ({})", label, account_id);
            }
        }
    }
}
