//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by operation, status
//! - `gateway_request_duration_seconds` (histogram): latency by operation
//! - `gateway_security_events_total` (counter): denials by kind
//!
//! # Design Decisions
//! - Every dispatch path records exactly one request metric, failures
//!   included
//! - Labels carry operation name and status code, never request content

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    if let Err(e) = PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter");
    } else {
        tracing::info!(address = %addr, "Metrics exporter listening");
    }
}

/// Record one gateway operation: name, duration, final status code.
pub fn record_request(operation: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a security denial (rate limit, payload bound, blocked origin...).
pub fn record_security_event(kind: &'static str) {
    counter!("gateway_security_events_total", "kind" => kind).increment(1);
}
