//! Prometheus metrics helpers.
//!
//! Thin wrappers over the `metrics` macros so handlers record counters and
//! durations with one call. The exporter handle is process-global; the
//! `/metrics` route renders it.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder (once per process) and return its handle
pub fn prometheus_handle() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .expect("Failed to install Prometheus recorder")
        })
        .clone()
}

/// Count a handled request by endpoint and response status
pub fn record_request(endpoint: &'static str, status: u16) {
    metrics::counter!(
        "recaster_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record handler latency by endpoint
pub fn record_duration(endpoint: &'static str, start: Instant) {
    metrics::histogram!("recaster_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Count a failed upstream fetch
pub fn record_upstream_error() {
    metrics::counter!("recaster_upstream_errors_total").increment(1);
}
