//! Prometheus metrics
//!
//! The recorder is installed once per process; `/metrics` renders it.

use axum::http::StatusCode;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Safe to call more than once.
pub fn init_metrics() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE
        .get_or_try_init(|| PrometheusBuilder::new().install_recorder())
        .map_err(|e| tracing::warn!("Failed to install Prometheus recorder: {}", e))
        .ok()
        .cloned()
}

/// Count an HTTP request by endpoint label
pub fn record_request(endpoint: &'static str) {
    metrics::counter!("ywait_http_requests_total", "endpoint" => endpoint).increment(1);
}

/// Count a dialogue turn by the stage it ended in
pub fn record_turn(stage: &'static str) {
    metrics::counter!("ywait_dialogue_turns_total", "stage" => stage).increment(1);
}

/// Count an error by kind
pub fn record_error(kind: &'static str) {
    metrics::counter!("ywait_errors_total", "kind" => kind).increment(1);
}

pub fn set_active_sessions(count: usize) {
    metrics::gauge!("ywait_active_sessions").set(count as f64);
}

/// GET /metrics
pub async fn metrics_handler() -> (StatusCode, String) {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}
