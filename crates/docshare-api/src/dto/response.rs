//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docshare_core::types::id::{CategoryId, CourseId, DocumentId, UserId, VersionId};
use docshare_entity::document::{Document, DocumentVersion, FileType};
use docshare_service::document::{DeleteOutcome, DocumentHistory};

/// Envelope wrapping every response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Optional human-readable message.
    pub message: Option<String>,
    /// Payload.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Creates a successful response with a message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// Creates a failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// A document as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: DocumentId,
    pub title: String,
    pub description: Option<String>,
    pub file_type: FileType,
    /// Reference of the current content.
    pub file_url: String,
    pub file_size: i64,
    pub category_ids: Vec<CategoryId>,
    pub course_id: Option<CourseId>,
    pub uploaded_by: UserId,
    pub is_approved: bool,
    pub approved_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(d: Document) -> Self {
        Self {
            id: d.id,
            title: d.title,
            description: d.description,
            file_type: d.file_type,
            file_url: d.file_ref,
            file_size: d.file_size,
            category_ids: d.category_ids,
            course_id: d.course_id,
            uploaded_by: d.uploaded_by,
            is_approved: d.is_approved,
            approved_by: d.approved_by,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// A document version as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub id: VersionId,
    pub document_id: DocumentId,
    pub version_number: i32,
    pub file_url: String,
    pub file_size: i64,
    pub edited_by: UserId,
    pub change_description: String,
    pub created_at: DateTime<Utc>,
}

impl From<DocumentVersion> for VersionResponse {
    fn from(v: DocumentVersion) -> Self {
        Self {
            id: v.id,
            document_id: v.document_id,
            version_number: v.version_number,
            file_url: v.file_ref,
            file_size: v.file_size,
            edited_by: v.edited_by,
            change_description: v.change_description,
            created_at: v.created_at,
        }
    }
}

/// Result of a write that may append a version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChangeResponse {
    /// The document after the change.
    pub document: DocumentResponse,
    /// The version appended by the change, if any.
    pub version: Option<VersionResponse>,
}

impl DocumentChangeResponse {
    pub fn new(document: Document, version: Option<DocumentVersion>) -> Self {
        Self {
            document: document.into(),
            version: version.map(Into::into),
        }
    }
}

/// A document with its history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentHistoryResponse {
    pub document: DocumentResponse,
    /// Newest first.
    pub versions: Vec<VersionResponse>,
    pub version_count: i64,
}

impl From<DocumentHistory> for DocumentHistoryResponse {
    fn from(h: DocumentHistory) -> Self {
        Self {
            document: h.document.into(),
            versions: h.versions.into_iter().map(Into::into).collect(),
            version_count: h.version_count,
        }
    }
}

/// Summary of a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub document_id: DocumentId,
    pub versions_removed: u64,
    pub blobs_deleted: usize,
    /// Blobs that could not be removed and remain in storage.
    pub blobs_failed: usize,
}

impl From<DeleteOutcome> for DeleteResponse {
    fn from(o: DeleteOutcome) -> Self {
        Self {
            document_id: o.document_id,
            versions_removed: o.versions_removed,
            blobs_deleted: o.blobs.deleted,
            blobs_failed: o.blobs.failed,
        }
    }
}

/// Current download reference of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadUrlResponse {
    pub document_id: DocumentId,
    pub url: String,
}

/// Version count of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionCountResponse {
    pub document_id: DocumentId,
    pub count: i64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when every dependency is healthy, else `"degraded"`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Document store backend and reachability.
    pub database: ComponentHealth,
    /// Blob store provider and reachability.
    pub blob_store: ComponentHealth,
}

/// Health of one dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub provider: String,
    pub healthy: bool,
}
