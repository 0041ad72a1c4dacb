//! Document catalog service: queries, metadata, approval and deletion.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use docshare_core::config::VersioningConfig;
use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::traits::blob::BlobStore;
use docshare_core::types::id::{CategoryId, CourseId, DocumentId, UserId};
use docshare_core::types::pagination::{PageRequest, PageResponse, MAX_PAGE_SIZE};
use docshare_database::store::DocumentStore;
use docshare_entity::document::{
    Document, DocumentPatch, DocumentSort, DocumentVersion, MetadataAudit,
};

use super::cleanup::{BlobCleanup, CleanupReport};
use super::upload::validate_title;
use super::METADATA_AUDIT_MESSAGE;

/// A document together with its version history.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentHistory {
    /// The document.
    pub document: Document,
    /// Versions, newest first.
    pub versions: Vec<DocumentVersion>,
    /// Number of versions.
    pub version_count: i64,
}

/// What a delete removed.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    /// The deleted document.
    pub document_id: DocumentId,
    /// Version rows removed; zero for a partial delete.
    pub versions_removed: u64,
    /// Blob cleanup tally.
    pub blobs: CleanupReport,
}

/// Read and write operations on document records.
#[derive(Debug, Clone)]
pub struct DocumentService {
    /// Document store.
    store: Arc<dyn DocumentStore>,
    /// Blob cleanup for deletes.
    cleanup: BlobCleanup,
    /// Version policy.
    versioning: VersioningConfig,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        versioning: VersioningConfig,
    ) -> Self {
        Self {
            store,
            cleanup: BlobCleanup::new(blobs),
            versioning,
        }
    }

    /// Gets a document by ID.
    pub async fn get(&self, id: DocumentId) -> AppResult<Document> {
        self.store.get(id).await
    }

    /// All documents, newest first.
    pub async fn list_all(&self) -> AppResult<Vec<Document>> {
        self.store.list_all().await
    }

    /// One page of documents.
    pub async fn list_page(
        &self,
        page: &PageRequest,
        sort: &DocumentSort,
    ) -> AppResult<PageResponse<Document>> {
        self.store.list_page(page, sort).await
    }

    /// Documents uploaded by a user. The user must exist.
    pub async fn list_by_uploader(&self, user_id: UserId) -> AppResult<Vec<Document>> {
        if self.store.find_user(user_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "User not found with ID: {user_id}"
            )));
        }
        self.store.list_by_uploader(user_id).await
    }

    /// Approved documents.
    pub async fn list_approved(&self) -> AppResult<Vec<Document>> {
        self.store.list_by_approval(true).await
    }

    /// Documents awaiting approval.
    pub async fn list_pending(&self) -> AppResult<Vec<Document>> {
        self.store.list_by_approval(false).await
    }

    /// Documents in a category.
    pub async fn list_by_category(&self, category_id: CategoryId) -> AppResult<Vec<Document>> {
        self.store.list_by_category(category_id).await
    }

    /// Documents attached to a course.
    pub async fn list_by_course(&self, course_id: CourseId) -> AppResult<Vec<Document>> {
        self.store.list_by_course(course_id).await
    }

    /// Most recently created documents. `limit` defaults to the
    /// configured value and is clamped to the page-size ceiling.
    pub async fn list_recent(&self, limit: Option<u32>) -> AppResult<Vec<Document>> {
        let limit = limit
            .unwrap_or(self.versioning.recent_limit)
            .clamp(1, MAX_PAGE_SIZE as u32);
        self.store.list_recent(limit).await
    }

    /// Case-insensitive title search.
    pub async fn search(&self, keyword: &str) -> AppResult<Vec<Document>> {
        self.store.search_by_title(keyword.trim()).await
    }

    /// Reference of the current content.
    pub async fn download_url(&self, id: DocumentId) -> AppResult<String> {
        Ok(self.store.get(id).await?.file_ref)
    }

    /// The document with its versions.
    pub async fn get_with_versions(&self, id: DocumentId) -> AppResult<DocumentHistory> {
        let document = self.store.get(id).await?;
        let versions = self.store.list_by_document(id).await?;
        Ok(DocumentHistory {
            document,
            version_count: versions.len() as i64,
            versions,
        })
    }

    /// Apply a partial metadata update.
    ///
    /// When audit versions are enabled a version repeating the current
    /// file is appended, edited by `editor` or else the uploader.
    pub async fn update_metadata(
        &self,
        id: DocumentId,
        patch: DocumentPatch,
        editor: Option<UserId>,
    ) -> AppResult<(Document, Option<DocumentVersion>)> {
        if let Some(title) = patch.effective_title() {
            validate_title(title)?;
        }

        let audit = self
            .versioning
            .audit_metadata_updates
            .then(|| MetadataAudit {
                edited_by: editor,
                change_description: METADATA_AUDIT_MESSAGE.to_string(),
            });

        let (document, version) = self.store.apply_metadata(id, &patch, audit.as_ref()).await?;
        info!(
            document_id = %id,
            audit_version = version.as_ref().map(|v| v.version_number),
            "Document metadata updated"
        );
        Ok((document, version))
    }

    /// Approve a document on behalf of `approver_id`.
    pub async fn approve(&self, id: DocumentId, approver_id: UserId) -> AppResult<Document> {
        let document = self.store.set_approval(id, Some(approver_id)).await?;
        info!(document_id = %id, approver_id = %approver_id, "Document approved");
        Ok(document)
    }

    /// Revoke approval. Rejecting an unapproved document changes nothing.
    pub async fn reject(&self, id: DocumentId) -> AppResult<Document> {
        let document = self.store.set_approval(id, None).await?;
        info!(document_id = %id, "Document rejected");
        Ok(document)
    }

    /// Delete a document.
    ///
    /// Blobs are removed best-effort first: the current one always, and
    /// with `delete_all_versions` every historical one as well. Storage
    /// failures never block the database delete. Without
    /// `delete_all_versions` the version rows stay retrievable by ID.
    pub async fn delete(
        &self,
        id: DocumentId,
        delete_all_versions: bool,
    ) -> AppResult<DeleteOutcome> {
        let document = self.store.get(id).await?;

        let mut references = vec![document.file_ref.clone()];
        if delete_all_versions {
            references.extend(
                self.store
                    .list_by_document(id)
                    .await?
                    .into_iter()
                    .map(|v| v.file_ref),
            );
        }
        let blobs = self.cleanup.delete_all(id, references).await;

        let versions_removed = if delete_all_versions {
            self.store.purge(id).await?
        } else {
            self.store.delete(id).await?;
            0
        };

        info!(
            document_id = %id,
            versions_removed,
            blobs_deleted = blobs.deleted,
            blobs_failed = blobs.failed,
            "Document deleted"
        );
        Ok(DeleteOutcome {
            document_id: id,
            versions_removed,
            blobs,
        })
    }
}
