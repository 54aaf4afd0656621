//! Router assembly: HTTP endpoints, upload body limit, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

// Headroom for multipart framing and the small text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Body limit for `max_upload_mb` of PDF plus multipart framing.
pub fn upload_body_limit(max_upload_mb: usize) -> usize {
    max_upload_mb
        .saturating_mul(1024 * 1024)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

/// Build the application router with:
/// - REST-ish API under `/api/v1/...`
/// - Request body limit sized to MAX_UPLOAD_MB (the PDF check reports the precise error)
/// - CORS (allow any origin/method/headers), adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = upload_body_limit(state.config.max_upload_mb);

    Router::new()
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/mcq/generate", post(http::http_post_generate))
        .route("/api/v1/mcq/generate-only", post(http::http_post_generate_only))
        .route("/api/v1/mcq/from-text", post(http::http_post_from_text))
        .route("/api/v1/quizzes/:id", get(http::http_get_quiz))
        // State + body limit + CORS + HTTP tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
