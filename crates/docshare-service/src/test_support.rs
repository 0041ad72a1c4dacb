//! Shared fixtures for service tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use docshare_core::config::{StorageConfig, VersioningConfig};
use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::traits::blob::{BlobStore, StoredBlob};
use docshare_database::store::Directory;
use docshare_database::MemoryDocumentStore;
use docshare_entity::directory::{Category, Course, UserRef};
use docshare_entity::document::{Document, DocumentVersion};
use docshare_storage::providers::MemoryBlobStore;

use crate::document::{
    DocumentService, FilePayload, UploadRequest, UploadService, VersionService,
};

/// Blob store whose every call fails.
#[derive(Debug)]
pub(crate) struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    fn provider_type(&self) -> &str {
        "failing"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }

    async fn put(&self, _: Bytes, _: &str, _: Option<&str>) -> AppResult<StoredBlob> {
        Err(AppError::storage("blob store unavailable"))
    }

    async fn delete(&self, _: &str) -> AppResult<()> {
        Err(AppError::storage("blob store unavailable"))
    }
}

pub(crate) struct Fixture {
    pub store: Arc<MemoryDocumentStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub student: UserRef,
    pub admin: UserRef,
    pub notes: Category,
    pub exams: Category,
    pub course: Course,
}

pub(crate) async fn fixture() -> Fixture {
    let store = Arc::new(MemoryDocumentStore::new());
    let student = store.ensure_user("student_one", Some("Student One")).await.unwrap();
    let admin = store.ensure_user("admin_user", Some("Admin")).await.unwrap();
    let notes = store.ensure_category("Lecture notes", None).await.unwrap();
    let exams = store.ensure_category("Past exams", None).await.unwrap();
    let course = store.ensure_course("CS101", "Intro to CS", None).await.unwrap();
    Fixture {
        store,
        blobs: Arc::new(MemoryBlobStore::new()),
        student,
        admin,
        notes,
        exams,
        course,
    }
}

pub(crate) fn pdf(name: &str, data: &'static [u8]) -> FilePayload {
    FilePayload {
        file_name: name.to_string(),
        content_type: Some("application/pdf".to_string()),
        data: Bytes::from_static(data),
    }
}

impl Fixture {
    pub fn uploads(&self) -> UploadService {
        UploadService::new(
            self.store.clone(),
            self.blobs.clone(),
            StorageConfig::default(),
        )
    }

    pub fn documents(&self) -> DocumentService {
        self.documents_with(VersioningConfig::default())
    }

    pub fn documents_with(&self, versioning: VersioningConfig) -> DocumentService {
        DocumentService::new(self.store.clone(), self.blobs.clone(), versioning)
    }

    pub fn versions(&self) -> VersionService {
        VersionService::new(self.store.clone())
    }

    pub fn upload_request(&self, title: &str, file: FilePayload) -> UploadRequest {
        UploadRequest {
            title: title.to_string(),
            description: None,
            uploaded_by: self.student.id,
            category_ids: vec![self.notes.id],
            course_id: None,
            file,
        }
    }

    pub async fn upload(&self, title: &str) -> (Document, DocumentVersion) {
        self.uploads()
            .upload(self.upload_request(title, pdf("notes.pdf", b"pdf bytes")))
            .await
            .unwrap()
    }
}
