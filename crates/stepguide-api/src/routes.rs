//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::handlers::{get_guide, health, process_video, receive_steps, receiver_welcome, submission_welcome};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::{AppState, ReceiverState};

/// Create the submission service router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // The limit is enforced while the body is extracted, after the auth gate
    let submission_routes = Router::new()
        .route("/process-video", post(process_video))
        .layer(DefaultBodyLimit::max(state.config.max_body_size()));

    Router::new()
        .route("/", get(submission_welcome))
        .merge(submission_routes)
        .merge(health_routes())
        .merge(metrics_routes(metrics_handle))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

/// Create the receiver service router.
pub fn create_receiver_router(state: ReceiverState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let callback_routes = Router::new()
        .route("/callbacks/steps", post(receive_steps))
        .route("/callbacks/guides/:id", get(get_guide))
        .route("/guides/:id", get(get_guide));

    Router::new()
        .route("/", get(receiver_welcome))
        .merge(callback_routes)
        .merge(health_routes())
        .merge(metrics_routes(metrics_handle))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

fn health_routes<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
}

fn metrics_routes<S: Clone + Send + Sync + 'static>(metrics_handle: Option<PrometheusHandle>) -> Router<S> {
    if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    }
}
