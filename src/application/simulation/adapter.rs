//! Trade Simulation Adapter
//!
//! Exposes the engine to interactive UI with request/response semantics.
//! State is published on a `watch` channel:
//!
//! ```text
//! Idle -> Loading{id} -> Succeeded{id} | Failed{id}
//! ```
//!
//! Requests are last-request-wins: a response only settles the state if the
//! state is still `Loading` for that same request. Anything else means a newer
//! request (or a reset) took over, and the response is discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::errors::SimulationError;
use crate::domain::evaluation::types::SimulationResult;
use crate::domain::ports::{SimulationBackend, SimulationRequest};
use crate::infrastructure::observability::Metrics;

/// Observable state of the adapter
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationState {
    Idle,
    Loading {
        request_id: u64,
    },
    Succeeded {
        request_id: u64,
        result: Box<SimulationResult>,
    },
    Failed {
        request_id: u64,
        error: SimulationError,
    },
}

impl SimulationState {
    pub fn request_id(&self) -> Option<u64> {
        match self {
            SimulationState::Idle => None,
            SimulationState::Loading { request_id }
            | SimulationState::Succeeded { request_id, .. }
            | SimulationState::Failed { request_id, .. } => Some(*request_id),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SimulationState::Loading { .. })
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SimulationState::Succeeded { .. } | SimulationState::Failed { .. }
        )
    }
}

/// What a single `run` call produced
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationOutcome {
    Succeeded(Box<SimulationResult>),
    Failed(SimulationError),
    /// A newer request or a reset took over; the response was dropped
    Superseded { request_id: u64 },
}

pub struct SimulationAdapter {
    backend: Arc<dyn SimulationBackend>,
    timeout: Duration,
    next_request_id: AtomicU64,
    state_tx: watch::Sender<SimulationState>,
    metrics: Option<Metrics>,
}

impl SimulationAdapter {
    pub fn new(backend: Arc<dyn SimulationBackend>, timeout: Duration) -> Self {
        let (state_tx, _) = watch::channel(SimulationState::Idle);
        Self {
            backend,
            timeout,
            next_request_id: AtomicU64::new(0),
            state_tx,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Receiver for state changes (UI side)
    pub fn subscribe(&self) -> watch::Receiver<SimulationState> {
        self.state_tx.subscribe()
    }

    /// Current state snapshot
    pub fn state(&self) -> SimulationState {
        self.state_tx.borrow().clone()
    }

    /// Drop whatever is in flight and go back to `Idle`
    pub fn reset(&self) {
        let previous = self.state_tx.send_replace(SimulationState::Idle);
        if previous.is_loading() {
            info!(
                "Simulation reset while request {:?} was in flight",
                previous.request_id()
            );
        }
    }

    /// Run one simulation; no automatic retry
    pub async fn run(&self, request: SimulationRequest) -> SimulationOutcome {
        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.state_tx
            .send_replace(SimulationState::Loading { request_id });
        debug!(
            "Simulation #{} started: pnl {} on {}",
            request_id,
            request.hypothetical_pnl,
            request.rules.display_name()
        );

        let started = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.backend.simulate(&request)).await
        {
            Ok(result) => result,
            Err(_) => Err(SimulationError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }),
        };
        if let Some(metrics) = &self.metrics {
            metrics.observe_simulation_latency(started.elapsed().as_secs_f64());
        }

        let settled = match &result {
            Ok(simulation) => SimulationState::Succeeded {
                request_id,
                result: Box::new(simulation.clone()),
            },
            Err(error) => SimulationState::Failed {
                request_id,
                error: error.clone(),
            },
        };

        // Check-and-set under the channel lock so a newer request can't slip in
        let applied = self.state_tx.send_if_modified(|state| {
            if *state == (SimulationState::Loading { request_id }) {
                *state = settled;
                true
            } else {
                false
            }
        });

        if !applied {
            debug!("Simulation #{} superseded; discarding response", request_id);
            self.record("superseded");
            return SimulationOutcome::Superseded { request_id };
        }

        match result {
            Ok(simulation) => {
                self.record("succeeded");
                SimulationOutcome::Succeeded(Box::new(simulation))
            }
            Err(error) => {
                warn!("Simulation #{} failed: {}", request_id, error);
                self.record("failed");
                SimulationOutcome::Failed(error)
            }
        }
    }

    /// Run on the tokio runtime and hand back the join handle
    pub fn spawn(self: &Arc<Self>, request: SimulationRequest) -> JoinHandle<SimulationOutcome> {
        let adapter = Arc::clone(self);
        tokio::spawn(async move { adapter.run(request).await })
    }

    fn record(&self, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_simulation(outcome);
        }
    }
}
