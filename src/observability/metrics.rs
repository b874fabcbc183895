//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rank_gateway_requests_total` (counter): requests by status
//! - `rank_gateway_request_duration_seconds` (histogram): latency distribution
//! - `rank_gateway_role_fetches_total` (counter): role list fetches by outcome
//! - `rank_gateway_rank_updates_total` (counter): membership updates by outcome
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a finished gateway request.
pub fn record_request(status: u16, start: Instant) {
    counter!("rank_gateway_requests_total", "status" => status.to_string()).increment(1);
    histogram!("rank_gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_role_fetch(outcome: &'static str) {
    counter!("rank_gateway_role_fetches_total", "outcome" => outcome).increment(1);
}

pub fn record_rank_update(outcome: &'static str) {
    counter!("rank_gateway_rank_updates_total", "outcome" => outcome).increment(1);
}
