//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use vforge_models::Operation;

/// Install the Prometheus recorder and return the handle that renders it.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "vforge_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vforge_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vforge_http_requests_in_flight";

    pub const ARTIFACTS_SWEPT_TOTAL: &str = "vforge_artifacts_swept_total";
    pub const SWEEP_FAILURES_TOTAL: &str = "vforge_sweep_failures_total";
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", route_label(path).to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_artifacts_swept(count: u32) {
    counter!(names::ARTIFACTS_SWEPT_TOTAL).increment(count as u64);
}

pub fn record_sweep_failure() {
    counter!(names::SWEEP_FAILURES_TOTAL).increment(1);
}

/// Known routes keep their path; anything else collapses to one label.
fn route_label(path: &str) -> &str {
    const FIXED: [&str; 4] = ["/", "/health", "/ready", "/metrics"];

    if FIXED.contains(&path) || Operation::ALL.iter().any(|op| op.route() == path) {
        path
    } else {
        "other"
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label() {
        assert_eq!(route_label("/add-voice"), "/add-voice");
        assert_eq!(route_label("/health"), "/health");
        assert_eq!(route_label("/wp-admin/install.php"), "other");
    }
}
