//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gate metrics (decisions, latency, strategy errors, route count)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `auth_gate_decisions_total` (counter): decisions by outcome
//! - `auth_gate_decision_duration_seconds` (histogram): time spent deciding
//! - `auth_gate_strategy_errors_total` (counter): failed strategy calls by scheme
//! - `auth_gate_public_routes` (gauge): registered public patterns
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed (tests, embedding apps)
//! - Labels are low-cardinality: never the request path

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one gate decision and the time it took.
pub fn record_decision(decision: &'static str, start: Instant) {
    counter!("auth_gate_decisions_total", "decision" => decision).increment(1);
    histogram!("auth_gate_decision_duration_seconds", "decision" => decision)
        .record(start.elapsed().as_secs_f64());
}

/// Record a strategy call that returned an error.
pub fn record_strategy_error(scheme: &'static str) {
    counter!("auth_gate_strategy_errors_total", "scheme" => scheme).increment(1);
}

/// Record the current number of registered public patterns.
pub fn record_public_routes(count: usize) {
    gauge!("auth_gate_public_routes").set(count as f64);
}
