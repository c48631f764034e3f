use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::account::AccountState;
use crate::domain::errors::SimulationError;
use crate::domain::evaluation::types::SimulationResult;
use crate::domain::rules::RuleSet;

/// A hypothetical trade to project against an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub account: AccountState,
    pub rules: RuleSet,
    pub hypothetical_pnl: Decimal,
}

impl SimulationRequest {
    pub fn new(account: AccountState, rules: RuleSet, hypothetical_pnl: Decimal) -> Self {
        Self {
            account,
            rules,
            hypothetical_pnl,
        }
    }
}

/// Where simulations actually run: in-process, or behind a remote call
#[async_trait]
pub trait SimulationBackend: Send + Sync {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, SimulationError>;
}
