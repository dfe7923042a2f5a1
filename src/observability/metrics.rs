//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_requests_total` (counter): requests by route, status
//! - `gate_request_duration_seconds` (histogram): latency by route
//! - `gate_rate_limited_total` (counter): rejections by route class
//! - `gate_login_attempts_total` (counter): login outcomes
//! - `gate_edge_redirects_total` (counter): edge gate redirects by target
//! - `gate_upstream_requests_total` (counter): webhook outcomes
//! - `gate_upstream_duration_seconds` (histogram): webhook latency
//! - `gate_rate_limit_entries` (gauge): tracked rate-limit identifiers
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &str, status: u16, start: Instant) {
    let route = route.to_string();
    ::metrics::counter!(
        "gate_requests_total",
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("gate_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited(route_class: &'static str) {
    ::metrics::counter!("gate_rate_limited_total", "route" => route_class).increment(1);
}

pub fn record_login(outcome: &'static str) {
    ::metrics::counter!("gate_login_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_edge_redirect(target: &'static str) {
    ::metrics::counter!("gate_edge_redirects_total", "target" => target).increment(1);
}

pub fn record_upstream(outcome: &'static str, start: Instant) {
    ::metrics::counter!("gate_upstream_requests_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("gate_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limit_entries(count: usize) {
    ::metrics::gauge!("gate_rate_limit_entries").set(count as f64);
}
