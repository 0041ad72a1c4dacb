//! Application builder: wires router, middleware and state into an Axum app.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware as axum_middleware;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Multipart framing on top of the largest accepted file.
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

/// Requests still running after `seconds` are answered with 408.
fn request_timeout(seconds: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(seconds))
}

/// Builds the complete Axum application with all routes and middleware.
///
/// With the local blob provider the storage root is also served under
/// `/files`, which is where its references point.
pub fn build_app(state: AppState) -> Router {
    let config = state.config.clone();
    let body_limit = usize::try_from(config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(BODY_LIMIT_HEADROOM);

    let mut app = build_router(state);
    if config.storage.provider == "local" {
        app = app.nest_service("/files", ServeDir::new(&config.storage.local.root_path));
    }

    app.layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(request_timeout(config.server.request_timeout_seconds))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.server.cors))
        .layer(axum_middleware::from_fn(request_logging))
}
