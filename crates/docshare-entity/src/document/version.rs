//! Document version entity.

use chrono::{DateTime, Utc};
use docshare_core::types::id::{DocumentId, UserId, VersionId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An immutable snapshot of a document's content pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DocumentVersion {
    /// Unique version identifier.
    pub id: VersionId,
    /// The document this version belongs to.
    pub document_id: DocumentId,
    /// Sequential version number, starting at 1.
    pub version_number: i32,
    /// Blob reference captured by this version.
    pub file_ref: String,
    /// Size in bytes.
    pub file_size: i64,
    /// User who produced this version.
    pub edited_by: UserId,
    /// What changed.
    pub change_description: String,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a version. The number is allocated by the
/// ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVersion {
    /// Owning document.
    pub document_id: DocumentId,
    /// Editor; must resolve in the directory.
    pub edited_by: UserId,
    /// Blob reference.
    pub file_ref: String,
    /// Size in bytes.
    pub file_size: i64,
    /// What changed.
    pub change_description: String,
}

/// Request to record a metadata-only change as a version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataAudit {
    /// Editor; the uploader when absent.
    pub edited_by: Option<UserId>,
    /// What changed.
    pub change_description: String,
}
