//! Document version handlers.

use axum::Json;
use axum::extract::State;

use docshare_core::types::id::{DocumentId, VersionId};

use crate::dto::response::{ApiResponse, VersionCountResponse, VersionResponse};
use crate::error::ApiResult;
use crate::extractors::ApiPath;
use crate::state::AppState;

/// GET /api/v1/document-versions/{version_id}
pub async fn get_version(
    State(state): State<AppState>,
    ApiPath(version_id): ApiPath<VersionId>,
) -> ApiResult<Json<ApiResponse<VersionResponse>>> {
    let version = state.version_service.get(version_id).await?;
    Ok(Json(ApiResponse::ok(version.into())))
}

/// GET /api/v1/document-versions/document/{document_id}
pub async fn list_versions(
    State(state): State<AppState>,
    ApiPath(document_id): ApiPath<DocumentId>,
) -> ApiResult<Json<ApiResponse<Vec<VersionResponse>>>> {
    let versions = state.version_service.list(document_id).await?;
    Ok(Json(ApiResponse::ok(
        versions.into_iter().map(VersionResponse::from).collect(),
    )))
}

/// GET /api/v1/document-versions/document/{document_id}/latest
pub async fn latest_version(
    State(state): State<AppState>,
    ApiPath(document_id): ApiPath<DocumentId>,
) -> ApiResult<Json<ApiResponse<VersionResponse>>> {
    let version = state.version_service.latest(document_id).await?;
    Ok(Json(ApiResponse::ok(version.into())))
}

/// GET /api/v1/document-versions/document/{document_id}/count
pub async fn version_count(
    State(state): State<AppState>,
    ApiPath(document_id): ApiPath<DocumentId>,
) -> ApiResult<Json<ApiResponse<VersionCountResponse>>> {
    let count = state.version_service.count(document_id).await?;
    Ok(Json(ApiResponse::ok(VersionCountResponse { document_id, count })))
}
