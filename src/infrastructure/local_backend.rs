use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::SimulationError;
use crate::domain::evaluation::HealthEngine;
use crate::domain::evaluation::types::SimulationResult;
use crate::domain::ports::{SimulationBackend, SimulationRequest};

/// Runs simulations in-process on a shared `HealthEngine`
pub struct LocalSimulationBackend {
    engine: Arc<HealthEngine>,
}

impl LocalSimulationBackend {
    pub fn new(engine: Arc<HealthEngine>) -> Self {
        Self { engine }
    }
}

impl Default for LocalSimulationBackend {
    fn default() -> Self {
        Self::new(Arc::new(HealthEngine::default()))
    }
}

#[async_trait]
impl SimulationBackend for LocalSimulationBackend {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, SimulationError> {
        self.engine
            .simulate(&request.account, &request.rules, request.hypothetical_pnl)
            .map_err(SimulationError::from)
    }
}
