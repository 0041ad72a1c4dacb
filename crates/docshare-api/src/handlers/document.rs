//! Document upload, query, update, approval and deletion handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use docshare_core::types::Patch;
use docshare_core::types::id::{CategoryId, CourseId, DocumentId, UserId};
use docshare_core::types::pagination::PageResponse;
use docshare_entity::document::{Document, DocumentPatch};
use docshare_service::document::{ContentChange, UploadRequest};

use crate::dto::request::{
    ApproveParams, DeleteParams, RecentParams, RollbackRequest, SearchParams,
    UpdateMetadataRequest,
};
use crate::dto::response::{
    ApiResponse, DeleteResponse, DocumentChangeResponse, DocumentHistoryResponse,
    DocumentResponse, DownloadUrlResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiPath, ApiQuery, DocumentForm, PageParams, ValidatedJson};
use crate::state::AppState;

type DocumentList = Json<ApiResponse<Vec<DocumentResponse>>>;

fn document_list(documents: Vec<Document>) -> DocumentList {
    Json(ApiResponse::ok(
        documents.into_iter().map(DocumentResponse::from).collect(),
    ))
}

/// POST /api/v1/documents (multipart)
pub async fn upload(
    State(state): State<AppState>,
    form: DocumentForm,
) -> ApiResult<(StatusCode, Json<ApiResponse<DocumentChangeResponse>>)> {
    let uploaded_by = form.require_user()?;
    let DocumentForm {
        title,
        description,
        category_ids,
        course_id,
        file,
        ..
    } = form;
    let file = file.ok_or_else(|| ApiError::bad_request("file is required"))?;

    let (document, version) = state
        .upload_service
        .upload(UploadRequest {
            title: title.unwrap_or_default(),
            description,
            uploaded_by,
            category_ids: category_ids.unwrap_or_default(),
            course_id: match course_id {
                Patch::Set(id) => Some(id),
                Patch::Keep | Patch::Clear => None,
            },
            file,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Document uploaded successfully",
            DocumentChangeResponse::new(document, Some(version)),
        )),
    ))
}

/// GET /api/v1/documents
pub async fn list_all(State(state): State<AppState>) -> ApiResult<DocumentList> {
    Ok(document_list(state.document_service.list_all().await?))
}

/// GET /api/v1/documents/paginated?page=&size=&sort_by=&direction=
pub async fn list_paginated(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<DocumentResponse>>>> {
    let (page, sort) = params.into_parts()?;
    let result = state.document_service.list_page(&page, &sort).await?;
    Ok(Json(ApiResponse::ok(result.map(DocumentResponse::from))))
}

/// GET /api/v1/documents/recent?limit=
pub async fn list_recent(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RecentParams>,
) -> ApiResult<DocumentList> {
    Ok(document_list(
        state.document_service.list_recent(params.limit).await?,
    ))
}

/// GET /api/v1/documents/approved
pub async fn list_approved(State(state): State<AppState>) -> ApiResult<DocumentList> {
    Ok(document_list(state.document_service.list_approved().await?))
}

/// GET /api/v1/documents/pending
pub async fn list_pending(State(state): State<AppState>) -> ApiResult<DocumentList> {
    Ok(document_list(state.document_service.list_pending().await?))
}

/// GET /api/v1/documents/search?keyword=
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> ApiResult<DocumentList> {
    Ok(document_list(
        state.document_service.search(&params.keyword).await?,
    ))
}

/// GET /api/v1/documents/user/{user_id}
pub async fn list_by_uploader(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> ApiResult<DocumentList> {
    Ok(document_list(
        state.document_service.list_by_uploader(user_id).await?,
    ))
}

/// GET /api/v1/documents/category/{category_id}
pub async fn list_by_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> ApiResult<DocumentList> {
    Ok(document_list(
        state.document_service.list_by_category(category_id).await?,
    ))
}

/// GET /api/v1/documents/course/{course_id}
pub async fn list_by_course(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<CourseId>,
) -> ApiResult<DocumentList> {
    Ok(document_list(
        state.document_service.list_by_course(course_id).await?,
    ))
}

/// GET /api/v1/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DocumentId>,
) -> ApiResult<Json<ApiResponse<DocumentResponse>>> {
    let document = state.document_service.get(id).await?;
    Ok(Json(ApiResponse::ok(document.into())))
}

/// GET /api/v1/documents/{id}/download-url
pub async fn download_url(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DocumentId>,
) -> ApiResult<Json<ApiResponse<DownloadUrlResponse>>> {
    let url = state.document_service.download_url(id).await?;
    Ok(Json(ApiResponse::ok(DownloadUrlResponse {
        document_id: id,
        url,
    })))
}

/// GET /api/v1/documents/{id}/history
pub async fn history(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DocumentId>,
) -> ApiResult<Json<ApiResponse<DocumentHistoryResponse>>> {
    let history = state.document_service.get_with_versions(id).await?;
    Ok(Json(ApiResponse::ok(history.into())))
}

/// PUT /api/v1/documents/{id} (multipart)
///
/// A `file` part replaces the content; otherwise only metadata changes.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DocumentId>,
    form: DocumentForm,
) -> ApiResult<Json<ApiResponse<DocumentChangeResponse>>> {
    let DocumentForm {
        title,
        description,
        user_id,
        category_ids,
        course_id,
        change_description,
        file,
    } = form;

    if let Some(file) = file {
        let edited_by =
            user_id.ok_or_else(|| ApiError::bad_request("user_id is required"))?;
        let (document, version) = state
            .upload_service
            .update_content(
                id,
                ContentChange {
                    edited_by,
                    change_description,
                    file,
                },
            )
            .await?;
        return Ok(Json(ApiResponse::with_message(
            "Document file updated successfully",
            DocumentChangeResponse::new(document, Some(version)),
        )));
    }

    let patch = DocumentPatch {
        title,
        description,
        category_ids,
        course_id,
    };
    let (document, version) = state
        .document_service
        .update_metadata(id, patch, user_id)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Document metadata updated successfully",
        DocumentChangeResponse::new(document, version),
    )))
}

/// PATCH /api/v1/documents/{id} (JSON)
pub async fn patch_metadata(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DocumentId>,
    ValidatedJson(request): ValidatedJson<UpdateMetadataRequest>,
) -> ApiResult<Json<ApiResponse<DocumentChangeResponse>>> {
    let (patch, editor) = request.into_parts();
    let (document, version) = state
        .document_service
        .update_metadata(id, patch, editor)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Document metadata updated successfully",
        DocumentChangeResponse::new(document, version),
    )))
}

/// PUT /api/v1/documents/{id}/approve?approver_id=
pub async fn approve(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DocumentId>,
    ApiQuery(params): ApiQuery<ApproveParams>,
) -> ApiResult<Json<ApiResponse<DocumentResponse>>> {
    let document = state
        .document_service
        .approve(id, params.approver_id)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Document approved successfully",
        document.into(),
    )))
}

/// PUT /api/v1/documents/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DocumentId>,
) -> ApiResult<Json<ApiResponse<DocumentResponse>>> {
    let document = state.document_service.reject(id).await?;
    Ok(Json(ApiResponse::with_message(
        "Document rejected successfully",
        document.into(),
    )))
}

/// DELETE /api/v1/documents/{id}?delete_all_versions=
pub async fn delete_document(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DocumentId>,
    ApiQuery(params): ApiQuery<DeleteParams>,
) -> ApiResult<Json<ApiResponse<DeleteResponse>>> {
    let outcome = state
        .document_service
        .delete(id, params.delete_all_versions)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Document deleted successfully",
        outcome.into(),
    )))
}

/// POST /api/v1/documents/{id}/rollback
pub async fn rollback(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DocumentId>,
    ValidatedJson(request): ValidatedJson<RollbackRequest>,
) -> ApiResult<Json<ApiResponse<DocumentChangeResponse>>> {
    let (document, version) = state
        .version_service
        .rollback(id, request.version_number, request.user_id)
        .await?;
    Ok(Json(ApiResponse::with_message(
        format!("Document rolled back to version {}", request.version_number),
        DocumentChangeResponse::new(document, Some(version)),
    )))
}
