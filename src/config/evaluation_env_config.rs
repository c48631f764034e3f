//! Evaluation configuration parsing from environment variables.
//!
//! This module handles the engine's warning buffer, the simulation balance
//! floor and the adapter timeout.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::evaluation::EvaluationPolicy;

/// Evaluation environment configuration
#[derive(Debug, Clone)]
pub struct EvaluationEnvConfig {
    pub warning_threshold_pct: Decimal,
    pub balance_floor: Decimal,
    pub simulation_timeout_ms: u64,
}

impl EvaluationEnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            warning_threshold_pct: Self::parse_decimal("WARNING_THRESHOLD_PCT", "0.90")?,
            balance_floor: Self::parse_decimal("BALANCE_FLOOR", "0")?,
            simulation_timeout_ms: Self::parse_u64("SIMULATION_TIMEOUT_MS", 5000)?,
        })
    }

    /// Build the engine policy, validating the configured values
    pub fn to_policy(&self) -> Result<EvaluationPolicy> {
        EvaluationPolicy::new(self.warning_threshold_pct, self.balance_floor)
            .context("Invalid evaluation policy configuration")
    }

    pub fn simulation_timeout(&self) -> Duration {
        Duration::from_millis(self.simulation_timeout_ms)
    }

    fn parse_decimal(key: &str, default: &str) -> Result<Decimal> {
        let raw = env::var(key).unwrap_or_else(|_| default.to_string());
        Decimal::from_str(raw.trim()).context(format!("Failed to parse {}", key))
    }

    fn parse_u64(key: &str, default: u64) -> Result<u64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u64>()
            .context(format!("Failed to parse {}", key))
    }
}
