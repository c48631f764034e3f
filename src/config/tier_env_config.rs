//! Plan configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use crate::application::tracking::tier_gate::{Plan, TierGate, TierLimits};

/// Tier environment configuration
#[derive(Debug, Clone)]
pub struct TierEnvConfig {
    pub plan: Plan,
    pub free_max_accounts: usize,
    pub free_simulation: bool,
}

impl TierEnvConfig {
    pub fn from_env() -> Result<Self> {
        let plan_str = env::var("PLAN").unwrap_or_else(|_| "free".to_string());
        let plan = Plan::from_str(&plan_str)?;

        Ok(Self {
            plan,
            free_max_accounts: env::var("FREE_TIER_MAX_ACCOUNTS")
                .unwrap_or_else(|_| "1".to_string())
                .parse::<usize>()
                .context("Failed to parse FREE_TIER_MAX_ACCOUNTS")?,
            free_simulation: env::var("FREE_TIER_SIMULATION")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<bool>()
                .unwrap_or(false),
        })
    }

    pub fn to_gate(&self) -> TierGate {
        TierGate::new(
            self.plan,
            TierLimits {
                free_max_accounts: self.free_max_accounts,
                free_simulation: self.free_simulation,
            },
        )
    }
}
