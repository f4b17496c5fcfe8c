//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

use vforge_models::Operation;

use crate::handlers::{add_caption, add_voice, crop, docs, health, merge, ready, trim};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let transform_routes = Router::new()
        .route(Operation::Trim.route(), post(trim))
        .route(Operation::Crop.route(), post(crop))
        .route(Operation::AddVoice.route(), post(add_voice))
        .route(Operation::AddCaption.route(), post(add_caption))
        .route(Operation::Merge.route(), post(merge))
        // Enforced while the form streams, so an oversized body surfaces as a
        // multipart error and gets the JSON error body
        .layer(DefaultBodyLimit::max(state.config.max_body_size));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .route("/", get(docs))
        .merge(transform_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
