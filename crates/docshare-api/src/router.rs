//! Route definitions for the DocShare HTTP API.
//!
//! All routes are organized by resource and mounted under `/api/v1`.

use axum::Router;
use axum::routing::{get, post, put};

use crate::handlers;
use crate::state::AppState;

/// Build the API router. Layers are added by [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(document_routes())
        .merge(version_routes())
        .route("/health", get(handlers::health::health));

    Router::new().nest("/api/v1", api_routes).with_state(state)
}

/// Document upload, queries, updates, approval, deletion, rollback
fn document_routes() -> Router<AppState> {
    use handlers::document as h;

    Router::new()
        .route("/documents", get(h::list_all).post(h::upload))
        .route("/documents/paginated", get(h::list_paginated))
        .route("/documents/recent", get(h::list_recent))
        .route("/documents/approved", get(h::list_approved))
        .route("/documents/pending", get(h::list_pending))
        .route("/documents/search", get(h::search))
        .route("/documents/user/{user_id}", get(h::list_by_uploader))
        .route("/documents/category/{category_id}", get(h::list_by_category))
        .route("/documents/course/{course_id}", get(h::list_by_course))
        .route(
            "/documents/{id}",
            get(h::get_document)
                .put(h::update)
                .patch(h::patch_metadata)
                .delete(h::delete_document),
        )
        .route("/documents/{id}/download-url", get(h::download_url))
        .route("/documents/{id}/history", get(h::history))
        .route("/documents/{id}/approve", put(h::approve))
        .route("/documents/{id}/reject", put(h::reject))
        .route("/documents/{id}/rollback", post(h::rollback))
}

/// Version history queries
fn version_routes() -> Router<AppState> {
    use handlers::version as h;

    Router::new()
        .route("/document-versions/{version_id}", get(h::get_version))
        .route(
            "/document-versions/document/{document_id}",
            get(h::list_versions),
        )
        .route(
            "/document-versions/document/{document_id}/latest",
            get(h::latest_version),
        )
        .route(
            "/document-versions/document/{document_id}/count",
            get(h::version_count),
        )
}
