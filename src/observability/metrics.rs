//! Metrics collection and exposition.
//!
//! # Metrics
//! - `flowgate_triggers_total` (counter): terminal trigger outcomes by status
//! - `flowgate_rate_limited_total` (counter): throttled trigger attempts

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(%error, "Failed to install metrics exporter"),
    }
}

/// Record one terminal trigger outcome.
pub fn record_trigger(status: &'static str) {
    metrics::counter!("flowgate_triggers_total", "status" => status).increment(1);
}

/// Record one rate-limited trigger attempt.
pub fn record_rate_limited() {
    metrics::counter!("flowgate_rate_limited_total").increment(1);
}
