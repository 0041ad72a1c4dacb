//! Storage contracts for the document lifecycle.
//!
//! [`DocumentCatalog`] owns document rows, [`VersionLedger`] owns the
//! append-only version rows, and [`Directory`] resolves users, categories
//! and courses. [`DocumentStore`] combines them and adds the multi-step
//! writes that must commit or roll back as one unit.
//!
//! Two backends implement these traits: [`crate::repositories::PgDocumentStore`]
//! and [`crate::memory::MemoryDocumentStore`].

pub mod errors;

use async_trait::async_trait;

use docshare_core::result::AppResult;
use docshare_core::types::id::{CategoryId, CourseId, DocumentId, UserId, VersionId};
use docshare_core::types::pagination::{PageRequest, PageResponse};
use docshare_entity::directory::{Category, Course, UserRef};
use docshare_entity::document::{
    ContentUpdate, Document, DocumentPatch, DocumentSort, DocumentVersion, MetadataAudit,
    NewDocument, NewVersion,
};

/// Read access to the user, category and course collaborators, plus the
/// idempotent inserts used by seeding.
#[async_trait]
pub trait Directory: Send + Sync + std::fmt::Debug {
    /// Find a user by ID.
    async fn find_user(&self, id: UserId) -> AppResult<Option<UserRef>>;

    /// Find every category whose ID is in `ids`. Unknown IDs are skipped,
    /// so callers compare lengths to detect partial resolution.
    async fn find_categories(&self, ids: &[CategoryId]) -> AppResult<Vec<Category>>;

    /// Find a course by ID.
    async fn find_course(&self, id: CourseId) -> AppResult<Option<Course>>;

    /// Insert a user unless the username exists; return the stored row.
    async fn ensure_user(&self, username: &str, full_name: Option<&str>) -> AppResult<UserRef>;

    /// Insert a category unless the name exists; return the stored row.
    async fn ensure_category(&self, name: &str, description: Option<&str>)
    -> AppResult<Category>;

    /// Insert a course unless the code exists; return the stored row.
    async fn ensure_course(
        &self,
        code: &str,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Course>;
}

/// Single-step operations on document records.
#[async_trait]
pub trait DocumentCatalog: Send + Sync + std::fmt::Debug {
    /// Create an unapproved document after resolving its uploader,
    /// categories (all or nothing) and course.
    async fn create(&self, new: &NewDocument) -> AppResult<Document>;

    /// Get a document by ID.
    async fn get(&self, id: DocumentId) -> AppResult<Document>;

    /// All documents, newest first.
    async fn list_all(&self) -> AppResult<Vec<Document>>;

    /// One page of documents in the requested order.
    async fn list_page(
        &self,
        page: &PageRequest,
        sort: &DocumentSort,
    ) -> AppResult<PageResponse<Document>>;

    /// Documents uploaded by a user, newest first.
    async fn list_by_uploader(&self, user_id: UserId) -> AppResult<Vec<Document>>;

    /// Documents with the given approval state, newest first.
    async fn list_by_approval(&self, approved: bool) -> AppResult<Vec<Document>>;

    /// Documents associated with a category, newest first.
    async fn list_by_category(&self, category_id: CategoryId) -> AppResult<Vec<Document>>;

    /// Documents associated with a course, newest first.
    async fn list_by_course(&self, course_id: CourseId) -> AppResult<Vec<Document>>;

    /// The `limit` most recently created documents.
    async fn list_recent(&self, limit: u32) -> AppResult<Vec<Document>>;

    /// Case-insensitive substring search on titles, newest first.
    async fn search_by_title(&self, keyword: &str) -> AppResult<Vec<Document>>;

    /// Apply a partial metadata update without touching versions.
    async fn update_metadata(&self, id: DocumentId, patch: &DocumentPatch) -> AppResult<Document>;

    /// Replace the content pointer and revoke approval, without touching
    /// versions.
    async fn update_content(&self, id: DocumentId, content: &ContentUpdate) -> AppResult<Document>;

    /// Approve (`Some(approver)`) or reject (`None`) a document.
    ///
    /// Rejecting an unapproved document changes nothing, not even
    /// `updated_at`.
    async fn set_approval(&self, id: DocumentId, approver: Option<UserId>) -> AppResult<Document>;

    /// Delete the document row. Version rows are left in place.
    async fn delete(&self, id: DocumentId) -> AppResult<()>;
}

/// Append-only version history.
#[async_trait]
pub trait VersionLedger: Send + Sync + std::fmt::Debug {
    /// `1` for a document with no versions, otherwise `max + 1`.
    async fn next_version_number(&self, document_id: DocumentId) -> AppResult<i32>;

    /// Allocate the next number and insert a version, serialized per
    /// document. Fails only when the document or editor does not exist.
    async fn append(&self, new: &NewVersion) -> AppResult<DocumentVersion>;

    /// Versions of a document, newest first.
    async fn list_by_document(&self, document_id: DocumentId) -> AppResult<Vec<DocumentVersion>>;

    /// Get a version by ID, including versions of deleted documents.
    async fn find_version(&self, id: VersionId) -> AppResult<DocumentVersion>;

    /// Highest-numbered version of a document.
    async fn latest(&self, document_id: DocumentId) -> AppResult<DocumentVersion>;

    /// Version `number` of a document.
    async fn by_document_and_number(
        &self,
        document_id: DocumentId,
        number: i32,
    ) -> AppResult<DocumentVersion>;

    /// Number of versions recorded for a document.
    async fn count(&self, document_id: DocumentId) -> AppResult<i64>;

    /// Remove every version of a document; returns how many were removed.
    async fn delete_all(&self, document_id: DocumentId) -> AppResult<u64>;
}

/// The full store: catalog, ledger and directory, plus the composite
/// writes that keep a document's current pointer equal to its latest
/// version.
#[async_trait]
pub trait DocumentStore: DocumentCatalog + VersionLedger + Directory {
    /// Backend name (`"postgres"` or `"memory"`).
    fn backend(&self) -> &'static str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Create a document together with version 1.
    async fn create_with_initial_version(
        &self,
        new: &NewDocument,
        change_description: &str,
    ) -> AppResult<(Document, DocumentVersion)>;

    /// Replace content, revoke approval and append a version.
    async fn replace_content(
        &self,
        id: DocumentId,
        content: &ContentUpdate,
        edited_by: UserId,
        change_description: &str,
    ) -> AppResult<(Document, DocumentVersion)>;

    /// Apply a metadata patch and, when `audit` is given, append a version
    /// that repeats the current file pointer.
    async fn apply_metadata(
        &self,
        id: DocumentId,
        patch: &DocumentPatch,
        audit: Option<&MetadataAudit>,
    ) -> AppResult<(Document, Option<DocumentVersion>)>;

    /// Append a version copying version `number` and make it current.
    /// Approval is revoked as for any content change.
    async fn rollback(
        &self,
        id: DocumentId,
        number: i32,
        edited_by: UserId,
        change_description: &str,
    ) -> AppResult<(Document, DocumentVersion)>;

    /// Delete all versions and then the document; returns how many
    /// versions were removed.
    async fn purge(&self, id: DocumentId) -> AppResult<u64>;
}
