//! Observability for PropGuard
//!
//! Metrics are collected in-process and rendered on demand in the Prometheus
//! text format. There is no HTTP listener.

pub mod metrics;

pub use metrics::Metrics;
