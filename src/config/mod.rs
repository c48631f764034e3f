//! Configuration module for PropGuard.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Evaluation, Tier and Observability.

mod evaluation_env_config;
mod observability_config;
mod tier_env_config;

pub use evaluation_env_config::EvaluationEnvConfig;
pub use observability_config::ObservabilityEnvConfig;
pub use tier_env_config::TierEnvConfig;

use anyhow::{Context, Result};

use crate::application::tracking::tier_gate::TierGate;
use crate::domain::evaluation::{EvaluationPolicy, HealthEngine};

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub evaluation: EvaluationEnvConfig,
    pub tier: TierEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let evaluation =
            EvaluationEnvConfig::from_env().context("Failed to load evaluation config")?;
        let tier = TierEnvConfig::from_env().context("Failed to load tier config")?;
        let observability = ObservabilityEnvConfig::from_env();

        // Fail at startup rather than on the first evaluation
        evaluation.to_policy()?;

        Ok(Self {
            evaluation,
            tier,
            observability,
        })
    }

    pub fn policy(&self) -> Result<EvaluationPolicy> {
        self.evaluation.to_policy()
    }

    /// Engine built from the configured policy
    pub fn create_engine(&self) -> Result<HealthEngine> {
        Ok(HealthEngine::new(self.policy()?))
    }

    pub fn tier_gate(&self) -> TierGate {
        self.tier.to_gate()
    }
}
