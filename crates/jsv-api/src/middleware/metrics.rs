//! # Prometheus Metrics
//!
//! Gate outcomes are counted through the `metrics` facade and exported by
//! `metrics-exporter-prometheus`. Without an installed recorder the
//! counters are no-ops, which keeps tests and library embedders quiet.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Counter of gate decisions, labelled by `outcome`.
pub const GATE_REQUESTS_TOTAL: &str = "jsv_gate_requests_total";

/// Increment [`GATE_REQUESTS_TOTAL`] for one decision.
pub fn record_gate_outcome(outcome: &'static str) {
    metrics::counter!(GATE_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}

/// Install the process-wide Prometheus recorder.
///
/// # Errors
///
/// Fails if a global recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!(GATE_REQUESTS_TOTAL, "Request bodies seen by the schema gate");
    Ok(handle)
}

/// GET /metrics: Prometheus text exposition.
pub async fn render(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}
