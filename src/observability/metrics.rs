//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devrelay_requests_total` (counter): relayed requests by method, status, upstream
//! - `devrelay_request_duration_seconds` (histogram): relay latency
//! - `devrelay_pages_served_total` (counter): generated pages by kind and status
//! - `devrelay_page_builds_total` (counter): rebuilds by outcome
//!
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram, Label};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one relayed request.
pub fn record_request(method: &str, status: u16, upstream: &str, start: Instant) {
    let labels = vec![
        Label::new("method", method.to_string()),
        Label::new("status", status.to_string()),
        Label::new("upstream", upstream.to_string()),
    ];
    counter!("devrelay_requests_total", labels.clone()).increment(1);
    histogram!("devrelay_request_duration_seconds", labels).record(start.elapsed().as_secs_f64());
}

/// Record one generated page.
pub fn record_page(kind: &'static str, status: u16) {
    counter!("devrelay_pages_served_total", "kind" => kind, "status" => status.to_string())
        .increment(1);
}

/// Record the outcome of a freshness check (`fresh`, `rebuilt`, `failed`).
pub fn record_build(outcome: &'static str) {
    counter!("devrelay_page_builds_total", "outcome" => outcome).increment(1);
}
