//! Metrics collection and exposition.
//!
//! # Metrics
//! - `timeout_floor_adjustments_total` (counter): timeout changes by stage
//! - `timeout_floor_requests_total` (counter): completed calls by outcome
//! - `timeout_floor_request_duration_seconds` (histogram): call latency

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a timeout change made by the policy.
pub fn record_adjustment(stage: &'static str) {
    counter!("timeout_floor_adjustments_total", "stage" => stage).increment(1);
}

/// Record a completed outbound call.
pub fn record_request(outcome: &'static str, start: Instant) {
    counter!("timeout_floor_requests_total", "outcome" => outcome).increment(1);
    histogram!("timeout_floor_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
