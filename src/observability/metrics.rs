//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_backend_requests_total` (counter): backend calls by method, path, status
//! - `gateway_backend_request_duration_seconds` (histogram): time to response headers
//! - `gateway_backend_failures_total` (counter): network failures by kind
//! - `gateway_fail_open_total` (counter): errors swallowed by fail-open routes

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::backend::NetworkFailure;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_backend_call(method: &str, path: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("path", route_label(path)),
        ("status", status.to_string()),
    ];
    metrics::counter!("gateway_backend_requests_total", &labels).increment(1);
    metrics::histogram!("gateway_backend_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_backend_failure(method: &str, path: &str, failure: NetworkFailure) {
    metrics::counter!(
        "gateway_backend_failures_total",
        "method" => method.to_string(),
        "path" => route_label(path),
        "kind" => failure.kind()
    )
    .increment(1);
}

pub fn record_fail_open(route: &'static str) {
    metrics::counter!("gateway_fail_open_total", "route" => route).increment(1);
}

/// Collapse ids out of a backend path to keep label cardinality bounded.
///
/// Any segment containing a digit is treated as an id:
/// `/chat/8f14e45f/message` becomes `/chat/:id/message`.
pub fn route_label(path: &str) -> String {
    path.split('/')
        .map(|seg| if seg.chars().any(|c| c.is_ascii_digit()) { ":id" } else { seg })
        .collect::<Vec<_>>()
        .join("/")
}
