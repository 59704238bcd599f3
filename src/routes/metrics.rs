//! Prometheus metrics endpoint
//!
//! Exposes relay metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use tracing::warn;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    if metrics::set_global_recorder(recorder).is_err() {
        warn!("A metrics recorder is already installed; /metrics will stay empty");
    }
    handle
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "relay_requests_total",
        "Relayed requests by endpoint and outward status"
    );
    metrics::describe_histogram!(
        "relay_request_duration_seconds",
        "Time spent relaying a request, upstream call included"
    );
    metrics::describe_counter!(
        "relay_upstream_failures_total",
        "Upstream calls that failed locally (timeout, unreachable)"
    );
    metrics::describe_counter!(
        "relay_rejections_total",
        "Requests rejected by the origin guard or the relay key check"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a relayed request
pub fn record_request(endpoint: &str, status: u16, duration_secs: f64) {
    metrics::counter!(
        "relay_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(duration_secs);
}

/// Record a local upstream failure (`timeout` or `unreachable`)
pub fn record_upstream_failure(kind: &'static str) {
    metrics::counter!("relay_upstream_failures_total", "kind" => kind).increment(1);
}

/// Record a request turned away before reaching the upstream
pub fn record_rejection(reason: &'static str) {
    metrics::counter!("relay_rejections_total", "reason" => reason).increment(1);
}
