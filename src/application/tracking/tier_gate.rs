use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::TrackerError;

/// Subscription plan of the dashboard user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

impl FromStr for Plan {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Plan::Free),
            "pro" | "paid" => Ok(Plan::Pro),
            _ => bail!("Invalid PLAN: {}. Must be 'free' or 'pro'", s),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Free => f.write_str("free"),
            Plan::Pro => f.write_str("pro"),
        }
    }
}

/// What the free plan may do; the pro plan is unrestricted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub free_max_accounts: usize,
    pub free_simulation: bool,
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            free_max_accounts: 1,
            free_simulation: false,
        }
    }
}

/// Decides whether a plan may use a feature
#[derive(Debug, Clone, Copy)]
pub struct TierGate {
    plan: Plan,
    limits: TierLimits,
}

impl TierGate {
    pub fn new(plan: Plan, limits: TierLimits) -> Self {
        Self { plan, limits }
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }

    /// Account cap for this plan (`None` = unlimited)
    pub fn max_accounts(&self) -> Option<usize> {
        match self.plan {
            Plan::Free => Some(self.limits.free_max_accounts),
            Plan::Pro => None,
        }
    }

    /// Allow opening another account when `tracked` are already open
    pub fn check_open_account(&self, tracked: usize) -> Result<(), TrackerError> {
        match self.max_accounts() {
            Some(limit) if tracked >= limit => Err(self.account_limit_reached()),
            _ => Ok(()),
        }
    }

    /// Error for an open refused by the account cap
    pub fn account_limit_reached(&self) -> TrackerError {
        TrackerError::TierLimit {
            plan: self.plan.to_string(),
            limit: self.max_accounts().unwrap_or(usize::MAX),
        }
    }

    pub fn check_simulation(&self) -> Result<(), TrackerError> {
        if self.plan == Plan::Free && !self.limits.free_simulation {
            return Err(TrackerError::FeatureLocked {
                plan: self.plan.to_string(),
                feature: "trade simulation".to_string(),
            });
        }
        Ok(())
    }
}
