//! Upload and content replacement.
//!
//! Both flows push bytes to the blob store first and only then touch the
//! document store. When the database step fails the blob is left behind;
//! its reference is logged so it can be removed by hand.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use docshare_core::config::StorageConfig;
use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::traits::blob::{BlobStore, StoredBlob};
use docshare_core::types::id::{CategoryId, CourseId, DocumentId, UserId};
use docshare_database::store::DocumentStore;
use docshare_entity::document::{
    ContentUpdate, Document, DocumentVersion, FileType, NewDocument,
};

use super::{CONTENT_UPDATE_MESSAGE, INITIAL_UPLOAD_MESSAGE, MAX_TITLE_LENGTH};

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct FilePayload {
    /// Client-supplied file name; its extension selects the file type.
    pub file_name: String,
    /// MIME type, if the client sent one.
    pub content_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

/// Parameters for a new upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Document title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Uploader.
    pub uploaded_by: UserId,
    /// Categories to associate; duplicates collapse.
    pub category_ids: Vec<CategoryId>,
    /// Course to associate.
    pub course_id: Option<CourseId>,
    /// The file.
    pub file: FilePayload,
}

/// Parameters for replacing a document's content.
#[derive(Debug, Clone)]
pub struct ContentChange {
    /// Editor recorded on the new version.
    pub edited_by: UserId,
    /// Version description; blank falls back to the default.
    pub change_description: Option<String>,
    /// The new file.
    pub file: FilePayload,
}

/// Handles uploads and content updates.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// Document store.
    store: Arc<dyn DocumentStore>,
    /// Blob store.
    blobs: Arc<dyn BlobStore>,
    /// Upload limits.
    config: StorageConfig,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        config: StorageConfig,
    ) -> Self {
        Self {
            store,
            blobs,
            config,
        }
    }

    /// Upload a file and create the document with version 1.
    pub async fn upload(&self, request: UploadRequest) -> AppResult<(Document, DocumentVersion)> {
        let title = validate_title(&request.title)?;
        self.check_payload(&request.file)?;

        let blob = self.push(&request.file).await?;
        let new = NewDocument {
            title,
            description: normalize(request.description),
            file_type: FileType::from_file_name(&request.file.file_name),
            file_ref: blob.reference.clone(),
            file_size: blob.size_bytes as i64,
            uploaded_by: request.uploaded_by,
            category_ids: request.category_ids,
            course_id: request.course_id,
        };

        let (document, version) = self
            .store
            .create_with_initial_version(&new, INITIAL_UPLOAD_MESSAGE)
            .await
            .inspect_err(|e| orphaned(&blob, e))?;

        info!(
            document_id = %document.id,
            uploaded_by = %document.uploaded_by,
            file_type = %document.file_type,
            size = document.file_size,
            "Document uploaded"
        );
        Ok((document, version))
    }

    /// Replace the content of a document, revoke its approval and append
    /// a version. The previous blob stays in place for the history.
    pub async fn update_content(
        &self,
        id: DocumentId,
        change: ContentChange,
    ) -> AppResult<(Document, DocumentVersion)> {
        self.check_payload(&change.file)?;
        self.store.get(id).await?;

        let blob = self.push(&change.file).await?;
        let content = ContentUpdate {
            file_ref: blob.reference.clone(),
            file_size: blob.size_bytes as i64,
            file_type: FileType::from_file_name(&change.file.file_name),
        };
        let description = normalize(change.change_description)
            .unwrap_or_else(|| CONTENT_UPDATE_MESSAGE.to_string());

        let (document, version) = self
            .store
            .replace_content(id, &content, change.edited_by, &description)
            .await
            .inspect_err(|e| orphaned(&blob, e))?;

        info!(
            document_id = %document.id,
            edited_by = %version.edited_by,
            version = version.version_number,
            "Document content updated"
        );
        Ok((document, version))
    }

    fn check_payload(&self, file: &FilePayload) -> AppResult<()> {
        if file.data.is_empty() {
            return Err(AppError::validation("File is empty"));
        }
        if file.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }
        Ok(())
    }

    async fn push(&self, file: &FilePayload) -> AppResult<StoredBlob> {
        self.blobs
            .put(
                file.data.clone(),
                &file.file_name,
                file.content_type.as_deref(),
            )
            .await
    }
}

fn orphaned(blob: &StoredBlob, error: &AppError) {
    warn!(
        reference = %blob.reference,
        error = %error,
        "Document write failed after blob upload; blob is orphaned"
    );
}

/// Trimmed title, or a validation error when blank or too long.
pub fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(title.to_string())
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, pdf, FailingBlobStore};
    use docshare_core::error::ErrorKind;
    use docshare_database::store::{DocumentCatalog, VersionLedger};

    #[tokio::test]
    async fn test_upload_creates_version_one() {
        let f = fixture().await;
        let uploads = f.uploads();

        let (document, version) = uploads
            .upload(UploadRequest {
                title: "  CS notes ".to_string(),
                description: Some("   ".to_string()),
                uploaded_by: f.student.id,
                category_ids: vec![f.notes.id, f.exams.id, f.notes.id],
                course_id: Some(f.course.id),
                file: pdf("notes.PDF", b"pdf bytes"),
            })
            .await
            .unwrap();

        assert_eq!(document.title, "CS notes");
        assert_eq!(document.description, None);
        assert_eq!(document.file_type, FileType::Pdf);
        assert_eq!(document.file_size, 9);
        assert!(!document.is_approved);
        assert_eq!(document.category_ids.len(), 2);
        assert_eq!(version.version_number, 1);
        assert_eq!(version.change_description, INITIAL_UPLOAD_MESSAGE);
        assert_eq!(version.file_ref, document.file_ref);
        assert!(f.blobs.contains(&document.file_ref));
        assert_eq!(f.store.count(document.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file_before_storing() {
        let f = fixture().await;
        let err = f
            .uploads()
            .upload(f.upload_request("Empty", pdf("empty.pdf", b"")))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(f.blobs.is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let f = fixture().await;
        let uploads = UploadService::new(
            f.store.clone(),
            f.blobs.clone(),
            StorageConfig {
                max_upload_size_bytes: 4,
                ..StorageConfig::default()
            },
        );
        let err = uploads
            .upload(f.upload_request("Big", pdf("big.pdf", b"too large")))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_upload_title_rules() {
        let f = fixture().await;
        let uploads = f.uploads();

        let blank = uploads
            .upload(f.upload_request("   ", pdf("a.pdf", b"x")))
            .await
            .unwrap_err();
        assert_eq!(blank.kind, ErrorKind::Validation);

        let long = "x".repeat(MAX_TITLE_LENGTH + 1);
        let too_long = uploads
            .upload(f.upload_request(&long, pdf("a.pdf", b"x")))
            .await
            .unwrap_err();
        assert_eq!(too_long.kind, ErrorKind::Validation);

        let exact = "é".repeat(MAX_TITLE_LENGTH);
        assert!(uploads
            .upload(f.upload_request(&exact, pdf("a.pdf", b"x")))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_upload_unknown_category_creates_nothing() {
        let f = fixture().await;
        let mut request = f.upload_request("Notes", pdf("a.pdf", b"x"));
        request.category_ids = vec![f.notes.id, CategoryId::new()];

        let err = f.uploads().upload(request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("One or more categories not found"));
        assert!(f.store.list_all().await.unwrap().is_empty());
        // The blob was pushed before the store rejected the document.
        assert_eq!(f.blobs.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_storage_failure_creates_nothing() {
        let f = fixture().await;
        let uploads = UploadService::new(
            f.store.clone(),
            Arc::new(FailingBlobStore),
            StorageConfig::default(),
        );
        let err = uploads
            .upload(f.upload_request("Notes", pdf("a.pdf", b"x")))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
        assert!(f.store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_content_resets_approval_and_appends() {
        let f = fixture().await;
        let (document, _) = f.upload("CS notes").await;
        f.store
            .set_approval(document.id, Some(f.admin.id))
            .await
            .unwrap();

        let (updated, version) = f
            .uploads()
            .update_content(
                document.id,
                ContentChange {
                    edited_by: f.student.id,
                    change_description: None,
                    file: pdf("slides.pptx", b"newer bytes"),
                },
            )
            .await
            .unwrap();

        assert!(!updated.is_approved);
        assert_eq!(updated.approved_by, None);
        assert_eq!(updated.file_type, FileType::Powerpoint);
        assert_eq!(updated.file_ref, version.file_ref);
        assert_eq!(version.version_number, 2);
        assert_eq!(version.change_description, CONTENT_UPDATE_MESSAGE);
        // Old blob is kept for the history.
        assert!(f.blobs.contains(&document.file_ref));
    }

    #[tokio::test]
    async fn test_update_content_unknown_document_stores_nothing() {
        let f = fixture().await;
        let err = f
            .uploads()
            .update_content(
                DocumentId::new(),
                ContentChange {
                    edited_by: f.student.id,
                    change_description: Some("new".to_string()),
                    file: pdf("a.pdf", b"x"),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(f.blobs.is_empty());
    }

    #[tokio::test]
    async fn test_update_content_unknown_editor_leaves_document() {
        let f = fixture().await;
        let (document, _) = f.upload("CS notes").await;
        let err = f
            .uploads()
            .update_content(
                document.id,
                ContentChange {
                    edited_by: UserId::new(),
                    change_description: None,
                    file: pdf("b.pdf", b"y"),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(f.store.get(document.id).await.unwrap(), document);
        assert_eq!(f.store.count(document.id).await.unwrap(), 1);
    }
}
