//! API routes.

use axum::body::Body;
use axum::http::Request;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::handlers::{get_transcript, health, transcript_preflight};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_headers, cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let transcript_routes = Router::new()
        .route("/api/transcript", get(get_transcript).options(transcript_preflight))
        .route("/transcript", get(get_transcript).options(transcript_preflight));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    });

    Router::new()
        .merge(transcript_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(TimeoutLayer::new(state.config.backstop_timeout()))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(cors_layer())
        .layer(middleware::from_fn(cors_headers))
        .layer(middleware::from_fn(request_id))
        .layer(trace_layer)
        .layer(middleware::from_fn(request_logging))
        .with_state(state)
}
