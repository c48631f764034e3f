//! Prometheus metrics definitions for PropGuard
//!
//! All metrics use the `propguard_` prefix.

use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

use crate::domain::evaluation::types::HealthStatus;

/// Prometheus metrics for evaluations and simulations
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Evaluations by resulting status
    pub evaluations_total: CounterVec,
    /// Simulations by outcome (succeeded, failed, superseded)
    pub simulations_total: CounterVec,
    /// Simulation round-trip latency in seconds
    pub simulation_latency_seconds: Histogram,
    /// Accounts currently tracked
    pub tracked_accounts: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with every collector registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let evaluations_total = CounterVec::new(
            Opts::new(
                "propguard_evaluations_total",
                "Account evaluations by resulting status",
            ),
            &["status"],
        )?;
        registry.register(Box::new(evaluations_total.clone()))?;

        let simulations_total = CounterVec::new(
            Opts::new(
                "propguard_simulations_total",
                "Trade simulations by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(simulations_total.clone()))?;

        let simulation_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "propguard_simulation_latency_seconds",
                "Trade simulation latency in seconds",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(simulation_latency_seconds.clone()))?;

        let tracked_accounts = Gauge::with_opts(Opts::new(
            "propguard_tracked_accounts",
            "Number of tracked challenge accounts",
        ))?;
        registry.register(Box::new(tracked_accounts.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            evaluations_total,
            simulations_total,
            simulation_latency_seconds,
            tracked_accounts,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_evaluation(&self, status: HealthStatus) {
        self.evaluations_total
            .with_label_values(&[status.as_str()])
            .inc();
    }

    pub fn inc_simulation(&self, outcome: &str) {
        self.simulations_total.with_label_values(&[outcome]).inc();
    }

    pub fn observe_simulation_latency(&self, seconds: f64) {
        self.simulation_latency_seconds.observe(seconds);
    }
}
