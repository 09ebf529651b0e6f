//! Prometheus metrics for both services.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "stepguide_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "stepguide_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "stepguide_http_requests_in_flight";

    // Submission metrics
    pub const SUBMISSIONS_TOTAL: &str = "stepguide_submissions_total";
    pub const PROCESSING_DURATION_SECONDS: &str = "stepguide_processing_duration_seconds";
    pub const AUTH_DENIED_TOTAL: &str = "stepguide_auth_denied_total";

    // Receiver metrics
    pub const GUIDES_RECEIVED_TOTAL: &str = "stepguide_guides_received_total";
    pub const GUIDE_LOOKUPS_TOTAL: &str = "stepguide_guide_lookups_total";
}

static GUIDE_LOOKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(/callbacks)?/guides/[^/]+/?$").expect("valid regex"));

/// Every path the two routers serve; anything else is labelled `unmatched`.
const KNOWN_PATHS: [&str; 8] = [
    "/",
    "/health",
    "/healthz",
    "/metrics",
    "/process-video",
    "/callbacks/steps",
    "/guides/:id",
    "/callbacks/guides/:id",
];

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a finished submission by video source and response status.
pub fn record_submission(source: &str, status: u16) {
    let labels = [("source", source.to_string()), ("status", status.to_string())];
    counter!(names::SUBMISSIONS_TOTAL, &labels).increment(1);
}

/// Record how long a processor took.
pub fn record_processing_duration(processor: &str, duration_secs: f64) {
    let labels = [("processor", processor.to_string())];
    histogram!(names::PROCESSING_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a request turned away by the auth gate.
pub fn record_auth_denied(path: &str) {
    let labels = [("path", sanitize_path(path))];
    counter!(names::AUTH_DENIED_TOTAL, &labels).increment(1);
}

/// Record a webhook receipt; `outcome` is `stored` or `failed`.
pub fn record_guide_received(outcome: &'static str) {
    counter!(names::GUIDES_RECEIVED_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a guide lookup.
pub fn record_guide_lookup(found: bool) {
    let outcome = if found { "found" } else { "not_found" };
    counter!(names::GUIDE_LOOKUPS_TOTAL, "outcome" => outcome).increment(1);
}

/// Sanitize path for metrics labels: guide ids collapse to `:id` and
/// unknown paths share one label.
fn sanitize_path(path: &str) -> String {
    let path = GUIDE_LOOKUP.replace(path, "$1/guides/:id");
    if KNOWN_PATHS.contains(&path.as_ref()) {
        path.to_string()
    } else {
        "unmatched".to_string()
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

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
