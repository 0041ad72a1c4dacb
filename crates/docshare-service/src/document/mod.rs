//! Document services: upload and content replacement, catalog queries
//! and metadata, version history and rollback.

pub mod cleanup;
pub mod service;
pub mod upload;
pub mod version;

pub use cleanup::BlobCleanup;
pub use service::{DeleteOutcome, DocumentHistory, DocumentService};
pub use upload::{ContentChange, FilePayload, UploadRequest, UploadService};
pub use version::VersionService;

/// Description of version 1.
pub const INITIAL_UPLOAD_MESSAGE: &str = "Initial upload";
/// Description of a content update when the caller supplies none.
pub const CONTENT_UPDATE_MESSAGE: &str = "Document file updated";
/// Description of the audit version appended after a metadata update.
pub const METADATA_AUDIT_MESSAGE: &str =
    "Metadata updated (title, description, categories, or course)";
/// Longest accepted title, in characters.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Description of a rollback version.
pub fn rollback_message(version_number: i32) -> String {
    format!("Rolled back to version {version_number}")
}
