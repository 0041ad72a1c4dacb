//! Version history queries and rollback.

use std::sync::Arc;

use tracing::info;

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::types::id::{DocumentId, UserId, VersionId};
use docshare_database::store::DocumentStore;
use docshare_entity::document::{Document, DocumentVersion};

use super::rollback_message;

/// Read access to the version ledger, plus rollback.
///
/// Queries by document ID do not require the document to exist, so the
/// history of a partially deleted document stays readable.
#[derive(Debug, Clone)]
pub struct VersionService {
    store: Arc<dyn DocumentStore>,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Versions of a document, newest first.
    pub async fn list(&self, document_id: DocumentId) -> AppResult<Vec<DocumentVersion>> {
        self.store.list_by_document(document_id).await
    }

    /// A version by ID.
    pub async fn get(&self, id: VersionId) -> AppResult<DocumentVersion> {
        self.store.find_version(id).await
    }

    /// Highest-numbered version of a document.
    pub async fn latest(&self, document_id: DocumentId) -> AppResult<DocumentVersion> {
        self.store.latest(document_id).await
    }

    /// Number of versions of a document.
    pub async fn count(&self, document_id: DocumentId) -> AppResult<i64> {
        self.store.count(document_id).await
    }

    /// Append a version copying version `version_number` and make its
    /// content current again. Nothing in the history is changed.
    pub async fn rollback(
        &self,
        document_id: DocumentId,
        version_number: i32,
        edited_by: UserId,
    ) -> AppResult<(Document, DocumentVersion)> {
        if version_number < 1 {
            return Err(AppError::validation("Version number must be positive"));
        }

        let (document, version) = self
            .store
            .rollback(
                document_id,
                version_number,
                edited_by,
                &rollback_message(version_number),
            )
            .await?;

        info!(
            document_id = %document_id,
            target = version_number,
            version = version.version_number,
            "Document rolled back"
        );
        Ok((document, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentChange;
    use crate::test_support::{fixture, pdf};
    use docshare_core::error::ErrorKind;
    use docshare_database::store::DocumentCatalog;
    use docshare_entity::document::FileType;

    #[tokio::test]
    async fn test_rollback_appends_copy_of_target() {
        let f = fixture().await;
        let (document, v1) = f.upload("CS notes").await;
        f.documents().approve(document.id, f.admin.id).await.unwrap();
        let (_, v2) = f
            .uploads()
            .update_content(
                document.id,
                ContentChange {
                    edited_by: f.student.id,
                    change_description: None,
                    file: pdf("deck.pptx", b"slides"),
                },
            )
            .await
            .unwrap();

        let versions = f.versions();
        let (current, v3) = versions
            .rollback(document.id, 1, f.admin.id)
            .await
            .unwrap();

        assert_eq!(v3.version_number, 3);
        assert_eq!(v3.file_ref, v1.file_ref);
        assert_eq!(v3.file_size, v1.file_size);
        assert_eq!(v3.change_description, "Rolled back to version 1");
        assert_eq!(current.file_ref, v1.file_ref);
        assert_eq!(current.file_type, FileType::Pdf);
        assert!(!current.is_approved);

        let history = versions.list(document.id).await.unwrap();
        assert_eq!(
            history.iter().map(|v| v.version_number).collect::<Vec<_>>(),
            vec![3, 2, 1]
        );
        assert_eq!(history[1], v2);
        assert_eq!(history[2], v1);
        assert_eq!(versions.latest(document.id).await.unwrap(), v3);
        assert_eq!(versions.count(document.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_rollback_to_missing_version() {
        let f = fixture().await;
        let (document, _) = f.upload("CS notes").await;
        let versions = f.versions();

        let err = versions
            .rollback(document.id, 7, f.student.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = versions
            .rollback(document.id, 0, f.student.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(versions.count(document.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_queries_on_unknown_document() {
        let f = fixture().await;
        let versions = f.versions();
        let unknown = DocumentId::new();

        assert!(versions.list(unknown).await.unwrap().is_empty());
        assert_eq!(versions.count(unknown).await.unwrap(), 0);
        assert_eq!(
            versions.latest(unknown).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            versions.get(VersionId::new()).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_upload_invariant_holds() {
        let f = fixture().await;
        let (document, _) = f.upload("CS notes").await;
        let versions = f.versions();

        let latest = versions.latest(document.id).await.unwrap();
        assert_eq!(latest.version_number, 1);
        assert_eq!(versions.count(document.id).await.unwrap(), 1);
        assert_eq!(
            f.store.get(document.id).await.unwrap().file_ref,
            latest.file_ref
        );
    }
}
