use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::SimulationError;
use crate::domain::evaluation::types::SimulationResult;
use crate::domain::ports::{SimulationBackend, SimulationRequest};
use crate::infrastructure::local_backend::LocalSimulationBackend;

/// Scripted step for `MockSimulationBackend`
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Answer from the local engine after a delay
    Respond(Duration),
    /// Fail with the given error after a delay
    Fail(Duration, SimulationError),
}

/// Backend that replays a script of delays and failures, one step per call
///
/// Once the script runs out, calls answer immediately from the local engine.
pub struct MockSimulationBackend {
    script: Mutex<VecDeque<MockStep>>,
    inner: LocalSimulationBackend,
    calls: AtomicUsize,
}

impl MockSimulationBackend {
    pub fn new(script: Vec<MockStep>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            inner: LocalSimulationBackend::default(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call answers after the matching delay
    pub fn with_delays(delays: Vec<Duration>) -> Self {
        Self::new(delays.into_iter().map(MockStep::Respond).collect())
    }

    /// Number of simulate calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> Result<MockStep, SimulationError> {
        let mut script = self.script.lock().map_err(|_| SimulationError::Transport {
            reason: "mock script lock poisoned".to_string(),
        })?;
        Ok(script.pop_front().unwrap_or(MockStep::Respond(Duration::ZERO)))
    }
}

impl Default for MockSimulationBackend {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl SimulationBackend for MockSimulationBackend {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, SimulationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let step = self.next_step()?;
        debug!("MockSimulationBackend: call #{} -> {:?}", call, step);

        match step {
            MockStep::Respond(delay) => {
                tokio::time::sleep(delay).await;
                self.inner.simulate(request).await
            }
            MockStep::Fail(delay, error) => {
                tokio::time::sleep(delay).await;
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountState;
    use crate::domain::rules::presets;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn request() -> SimulationRequest {
        SimulationRequest::new(
            AccountState::new(dec!(100000)),
            presets::two_step_phase_one(),
            dec!(-250),
        )
    }

    #[tokio::test]
    async fn test_script_then_default() {
        let backend = MockSimulationBackend::new(vec![MockStep::Fail(
            Duration::ZERO,
            SimulationError::Timeout { duration_ms: 10 },
        )]);

        assert_eq!(
            backend.simulate(&request()).await,
            Err(SimulationError::Timeout { duration_ms: 10 })
        );
        assert!(backend.simulate(&request()).await.is_ok());
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_poisoned_script_is_a_transport_failure() {
        let backend = Arc::new(MockSimulationBackend::default());

        let poisoner = Arc::clone(&backend);
        let joined = std::thread::spawn(move || {
            let _script = poisoner.script.lock().unwrap();
            panic!("script writer crashed");
        })
        .join();
        assert!(joined.is_err());

        assert!(matches!(
            backend.simulate(&request()).await,
            Err(SimulationError::Transport { .. })
        ));
    }
}
