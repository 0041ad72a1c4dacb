//! PostgreSQL implementations of the store traits.

pub mod directory;
pub mod document;
pub mod version;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::id::{CategoryId, CourseId, DocumentId, UserId, VersionId};
use docshare_core::types::pagination::{PageRequest, PageResponse};
use docshare_core::types::Patch;
use docshare_entity::directory::{Category, Course, UserRef};
use docshare_entity::document::{
    category_set, ContentUpdate, Document, DocumentPatch, DocumentSort, DocumentVersion, FileType,
    MetadataAudit, NewDocument, NewVersion,
};

use crate::store::errors::{no_versions, version_not_found, version_number_not_found};
use crate::store::{DocumentCatalog, DocumentStore, Directory, VersionLedger};

pub use directory::DirectoryRepository;
pub use document::DocumentRepository;
pub use version::VersionRepository;

/// Document store backed by PostgreSQL.
///
/// Composite writes run in one transaction that first locks the document
/// row, so concurrent writers to the same document allocate version
/// numbers one at a time.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> AppResult<PoolConnection<Postgres>> {
        self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }
}

async fn commit(tx: Transaction<'static, Postgres>) -> AppResult<()> {
    tx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
}

#[async_trait]
impl Directory for PgDocumentStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<UserRef>> {
        DirectoryRepository::find_user(&mut *self.conn().await?, id).await
    }

    async fn find_categories(&self, ids: &[CategoryId]) -> AppResult<Vec<Category>> {
        DirectoryRepository::find_categories(&mut *self.conn().await?, ids).await
    }

    async fn find_course(&self, id: CourseId) -> AppResult<Option<Course>> {
        DirectoryRepository::find_course(&mut *self.conn().await?, id).await
    }

    async fn ensure_user(&self, username: &str, full_name: Option<&str>) -> AppResult<UserRef> {
        DirectoryRepository::ensure_user(&mut *self.conn().await?, username, full_name).await
    }

    async fn ensure_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Category> {
        DirectoryRepository::ensure_category(&mut *self.conn().await?, name, description).await
    }

    async fn ensure_course(
        &self,
        code: &str,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Course> {
        DirectoryRepository::ensure_course(&mut *self.conn().await?, code, name, description).await
    }
}

#[async_trait]
impl DocumentCatalog for PgDocumentStore {
    async fn create(&self, new: &NewDocument) -> AppResult<Document> {
        let mut tx = self.begin().await?;
        let id = DocumentId::new();
        let categories = category_set(new.category_ids.iter().copied());
        DirectoryRepository::require_user(&mut tx, new.uploaded_by).await?;
        DirectoryRepository::require_categories(&mut tx, &categories).await?;
        if let Some(course_id) = new.course_id {
            DirectoryRepository::require_course(&mut tx, course_id).await?;
        }
        DocumentRepository::insert(&mut tx, id, new, &categories, Utc::now()).await?;
        let document = DocumentRepository::get(&mut tx, id).await?;
        commit(tx).await?;
        Ok(document)
    }

    async fn get(&self, id: DocumentId) -> AppResult<Document> {
        DocumentRepository::get(&mut *self.conn().await?, id).await
    }

    async fn list_all(&self) -> AppResult<Vec<Document>> {
        DocumentRepository::list_all(&mut *self.conn().await?).await
    }

    async fn list_page(
        &self,
        page: &PageRequest,
        sort: &DocumentSort,
    ) -> AppResult<PageResponse<Document>> {
        DocumentRepository::list_page(&mut *self.conn().await?, page, sort).await
    }

    async fn list_by_uploader(&self, user_id: UserId) -> AppResult<Vec<Document>> {
        DocumentRepository::list_by_uploader(&mut *self.conn().await?, user_id).await
    }

    async fn list_by_approval(&self, approved: bool) -> AppResult<Vec<Document>> {
        DocumentRepository::list_by_approval(&mut *self.conn().await?, approved).await
    }

    async fn list_by_category(&self, category_id: CategoryId) -> AppResult<Vec<Document>> {
        DocumentRepository::list_by_category(&mut *self.conn().await?, category_id).await
    }

    async fn list_by_course(&self, course_id: CourseId) -> AppResult<Vec<Document>> {
        DocumentRepository::list_by_course(&mut *self.conn().await?, course_id).await
    }

    async fn list_recent(&self, limit: u32) -> AppResult<Vec<Document>> {
        DocumentRepository::list_recent(&mut *self.conn().await?, limit).await
    }

    async fn search_by_title(&self, keyword: &str) -> AppResult<Vec<Document>> {
        DocumentRepository::search_by_title(&mut *self.conn().await?, keyword).await
    }

    async fn update_metadata(&self, id: DocumentId, patch: &DocumentPatch) -> AppResult<Document> {
        let (document, _) = self.apply_metadata(id, patch, None).await?;
        Ok(document)
    }

    async fn update_content(&self, id: DocumentId, content: &ContentUpdate) -> AppResult<Document> {
        let mut tx = self.begin().await?;
        DocumentRepository::lock(&mut tx, id).await?;
        DocumentRepository::set_content(&mut tx, id, content, Utc::now()).await?;
        let document = DocumentRepository::get(&mut tx, id).await?;
        commit(tx).await?;
        Ok(document)
    }

    async fn set_approval(&self, id: DocumentId, approver: Option<UserId>) -> AppResult<Document> {
        let mut tx = self.begin().await?;
        DocumentRepository::lock(&mut tx, id).await?;
        match approver {
            Some(approver) => {
                DirectoryRepository::require_user(&mut tx, approver).await?;
                DocumentRepository::approve(&mut tx, id, approver, Utc::now()).await?;
            }
            None => DocumentRepository::reject(&mut tx, id, Utc::now()).await?,
        }
        let document = DocumentRepository::get(&mut tx, id).await?;
        commit(tx).await?;
        Ok(document)
    }

    async fn delete(&self, id: DocumentId) -> AppResult<()> {
        DocumentRepository::delete(&mut *self.conn().await?, id).await
    }
}

#[async_trait]
impl VersionLedger for PgDocumentStore {
    async fn next_version_number(&self, document_id: DocumentId) -> AppResult<i32> {
        VersionRepository::next_number(&mut *self.conn().await?, document_id).await
    }

    async fn append(&self, new: &NewVersion) -> AppResult<DocumentVersion> {
        let mut tx = self.begin().await?;
        DocumentRepository::lock(&mut tx, new.document_id).await?;
        DirectoryRepository::require_user(&mut tx, new.edited_by).await?;
        let number = VersionRepository::next_number(&mut tx, new.document_id).await?;
        let version = VersionRepository::insert(&mut tx, new, number, Utc::now()).await?;
        commit(tx).await?;
        Ok(version)
    }

    async fn list_by_document(&self, document_id: DocumentId) -> AppResult<Vec<DocumentVersion>> {
        VersionRepository::list_by_document(&mut *self.conn().await?, document_id).await
    }

    async fn find_version(&self, id: VersionId) -> AppResult<DocumentVersion> {
        VersionRepository::find_by_id(&mut *self.conn().await?, id)
            .await?
            .ok_or_else(|| version_not_found(id))
    }

    async fn latest(&self, document_id: DocumentId) -> AppResult<DocumentVersion> {
        VersionRepository::find_latest(&mut *self.conn().await?, document_id)
            .await?
            .ok_or_else(|| no_versions(document_id))
    }

    async fn by_document_and_number(
        &self,
        document_id: DocumentId,
        number: i32,
    ) -> AppResult<DocumentVersion> {
        VersionRepository::find_by_number(&mut *self.conn().await?, document_id, number)
            .await?
            .ok_or_else(|| version_number_not_found(document_id, number))
    }

    async fn count(&self, document_id: DocumentId) -> AppResult<i64> {
        VersionRepository::count(&mut *self.conn().await?, document_id).await
    }

    async fn delete_all(&self, document_id: DocumentId) -> AppResult<u64> {
        VersionRepository::delete_all(&mut *self.conn().await?, document_id).await
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    async fn create_with_initial_version(
        &self,
        new: &NewDocument,
        change_description: &str,
    ) -> AppResult<(Document, DocumentVersion)> {
        let mut tx = self.begin().await?;
        let id = DocumentId::new();
        let now = Utc::now();
        let categories = category_set(new.category_ids.iter().copied());

        DirectoryRepository::require_user(&mut tx, new.uploaded_by).await?;
        DirectoryRepository::require_categories(&mut tx, &categories).await?;
        if let Some(course_id) = new.course_id {
            DirectoryRepository::require_course(&mut tx, course_id).await?;
        }

        DocumentRepository::insert(&mut tx, id, new, &categories, now).await?;
        let version = VersionRepository::insert(
            &mut tx,
            &NewVersion {
                document_id: id,
                edited_by: new.uploaded_by,
                file_ref: new.file_ref.clone(),
                file_size: new.file_size,
                change_description: change_description.to_string(),
            },
            1,
            now,
        )
        .await?;
        let document = DocumentRepository::get(&mut tx, id).await?;
        commit(tx).await?;

        debug!(document_id = %id, "Created document with initial version");
        Ok((document, version))
    }

    async fn replace_content(
        &self,
        id: DocumentId,
        content: &ContentUpdate,
        edited_by: UserId,
        change_description: &str,
    ) -> AppResult<(Document, DocumentVersion)> {
        let mut tx = self.begin().await?;
        let now = Utc::now();
        DocumentRepository::lock(&mut tx, id).await?;
        DirectoryRepository::require_user(&mut tx, edited_by).await?;

        DocumentRepository::set_content(&mut tx, id, content, now).await?;
        let number = VersionRepository::next_number(&mut tx, id).await?;
        let version = VersionRepository::insert(
            &mut tx,
            &NewVersion {
                document_id: id,
                edited_by,
                file_ref: content.file_ref.clone(),
                file_size: content.file_size,
                change_description: change_description.to_string(),
            },
            number,
            now,
        )
        .await?;
        let document = DocumentRepository::get(&mut tx, id).await?;
        commit(tx).await?;
        Ok((document, version))
    }

    async fn apply_metadata(
        &self,
        id: DocumentId,
        patch: &DocumentPatch,
        audit: Option<&MetadataAudit>,
    ) -> AppResult<(Document, Option<DocumentVersion>)> {
        let mut tx = self.begin().await?;
        let now = Utc::now();
        DocumentRepository::lock(&mut tx, id).await?;
        let current = DocumentRepository::get(&mut tx, id).await?;

        let categories = patch
            .category_ids
            .as_ref()
            .map(|ids| category_set(ids.iter().copied()));
        if let Some(categories) = &categories {
            DirectoryRepository::require_categories(&mut tx, categories).await?;
        }
        if let Patch::Set(course_id) = patch.course_id {
            DirectoryRepository::require_course(&mut tx, course_id).await?;
        }
        let editor = audit.map(|a| a.edited_by.unwrap_or(current.uploaded_by));
        if let Some(editor) = editor {
            DirectoryRepository::require_user(&mut tx, editor).await?;
        }

        DocumentRepository::apply_patch(&mut tx, id, patch, now).await?;
        if let Some(categories) = &categories {
            DocumentRepository::replace_categories(&mut tx, id, categories).await?;
        }

        let version = match (audit, editor) {
            (Some(audit), Some(editor)) => {
                let number = VersionRepository::next_number(&mut tx, id).await?;
                let version = VersionRepository::insert(
                    &mut tx,
                    &NewVersion {
                        document_id: id,
                        edited_by: editor,
                        file_ref: current.file_ref.clone(),
                        file_size: current.file_size,
                        change_description: audit.change_description.clone(),
                    },
                    number,
                    now,
                )
                .await?;
                Some(version)
            }
            _ => None,
        };

        let document = DocumentRepository::get(&mut tx, id).await?;
        commit(tx).await?;
        Ok((document, version))
    }

    async fn rollback(
        &self,
        id: DocumentId,
        number: i32,
        edited_by: UserId,
        change_description: &str,
    ) -> AppResult<(Document, DocumentVersion)> {
        let mut tx = self.begin().await?;
        let now = Utc::now();
        DocumentRepository::lock(&mut tx, id).await?;
        let target = VersionRepository::find_by_number(&mut tx, id, number)
            .await?
            .ok_or_else(|| version_number_not_found(id, number))?;
        DirectoryRepository::require_user(&mut tx, edited_by).await?;

        let content = ContentUpdate {
            file_ref: target.file_ref.clone(),
            file_size: target.file_size,
            file_type: FileType::from_file_name(&target.file_ref),
        };
        DocumentRepository::set_content(&mut tx, id, &content, now).await?;
        let next = VersionRepository::next_number(&mut tx, id).await?;
        let version = VersionRepository::insert(
            &mut tx,
            &NewVersion {
                document_id: id,
                edited_by,
                file_ref: target.file_ref,
                file_size: target.file_size,
                change_description: change_description.to_string(),
            },
            next,
            now,
        )
        .await?;
        let document = DocumentRepository::get(&mut tx, id).await?;
        commit(tx).await?;
        Ok((document, version))
    }

    async fn purge(&self, id: DocumentId) -> AppResult<u64> {
        let mut tx = self.begin().await?;
        DocumentRepository::lock(&mut tx, id).await?;
        let removed = VersionRepository::delete_all(&mut tx, id).await?;
        DocumentRepository::delete(&mut tx, id).await?;
        commit(tx).await?;
        Ok(removed)
    }
}
