//! In-memory document store.
//!
//! Used for development, for tests, and whenever `database.provider` is
//! `"memory"`. All state sits behind one async `RwLock`; every write holds
//! the write lock for its whole duration, which serializes version-number
//! allocation and makes composite operations atomic.

mod state;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use docshare_core::result::AppResult;
use docshare_core::types::id::{CategoryId, CourseId, DocumentId, UserId, VersionId};
use docshare_core::types::pagination::{PageRequest, PageResponse};
use docshare_core::types::Patch;
use docshare_entity::directory::{Category, Course, UserRef};
use docshare_entity::document::{
    category_set, ContentUpdate, Document, DocumentPatch, DocumentSort, DocumentVersion, FileType,
    MetadataAudit, NewDocument, NewVersion,
};

use self::state::MemoryState;
use crate::store::errors::{no_versions, version_not_found};
use crate::store::{DocumentCatalog, DocumentStore, Directory, VersionLedger};

/// Document store that keeps everything in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first() -> DocumentSort {
    DocumentSort::default()
}

#[async_trait]
impl Directory for MemoryDocumentStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<UserRef>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_categories(&self, ids: &[CategoryId]) -> AppResult<Vec<Category>> {
        let state = self.state.read().await;
        Ok(category_set(ids.iter().copied())
            .into_iter()
            .filter_map(|id| state.categories.get(&id).cloned())
            .collect())
    }

    async fn find_course(&self, id: CourseId) -> AppResult<Option<Course>> {
        Ok(self.state.read().await.courses.get(&id).cloned())
    }

    async fn ensure_user(&self, username: &str, full_name: Option<&str>) -> AppResult<UserRef> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.values().find(|u| u.username == username) {
            return Ok(user.clone());
        }
        let user = UserRef {
            id: UserId::new(),
            username: username.to_string(),
            full_name: full_name.map(str::to_string),
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn ensure_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Category> {
        let mut state = self.state.write().await;
        if let Some(category) = state.categories.values().find(|c| c.name == name) {
            return Ok(category.clone());
        }
        let category = Category {
            id: CategoryId::new(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn ensure_course(
        &self,
        code: &str,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Course> {
        let mut state = self.state.write().await;
        if let Some(course) = state.courses.values().find(|c| c.code == code) {
            return Ok(course.clone());
        }
        let course = Course {
            id: CourseId::new(),
            code: code.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };
        state.courses.insert(course.id, course.clone());
        Ok(course)
    }
}

#[async_trait]
impl DocumentCatalog for MemoryDocumentStore {
    async fn create(&self, new: &NewDocument) -> AppResult<Document> {
        let mut state = self.state.write().await;
        let id = insert_document(&mut state, new)?;
        state.document(id)
    }

    async fn get(&self, id: DocumentId) -> AppResult<Document> {
        self.state.read().await.document(id)
    }

    async fn list_all(&self) -> AppResult<Vec<Document>> {
        Ok(self.state.read().await.select(&newest_first(), |_| true))
    }

    async fn list_page(
        &self,
        page: &PageRequest,
        sort: &DocumentSort,
    ) -> AppResult<PageResponse<Document>> {
        let all = self.state.read().await.select(sort, |_| true);
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn list_by_uploader(&self, user_id: UserId) -> AppResult<Vec<Document>> {
        Ok(self
            .state
            .read()
            .await
            .select(&newest_first(), |d| d.uploaded_by == user_id))
    }

    async fn list_by_approval(&self, approved: bool) -> AppResult<Vec<Document>> {
        Ok(self
            .state
            .read()
            .await
            .select(&newest_first(), |d| d.is_approved == approved))
    }

    async fn list_by_category(&self, category_id: CategoryId) -> AppResult<Vec<Document>> {
        Ok(self
            .state
            .read()
            .await
            .select(&newest_first(), |d| d.has_category(category_id)))
    }

    async fn list_by_course(&self, course_id: CourseId) -> AppResult<Vec<Document>> {
        Ok(self
            .state
            .read()
            .await
            .select(&newest_first(), |d| d.course_id == Some(course_id)))
    }

    async fn list_recent(&self, limit: u32) -> AppResult<Vec<Document>> {
        let mut documents = self.state.read().await.select(&newest_first(), |_| true);
        documents.truncate(limit as usize);
        Ok(documents)
    }

    async fn search_by_title(&self, keyword: &str) -> AppResult<Vec<Document>> {
        Ok(self
            .state
            .read()
            .await
            .select(&newest_first(), |d| d.title_matches(keyword)))
    }

    async fn update_metadata(&self, id: DocumentId, patch: &DocumentPatch) -> AppResult<Document> {
        let (document, _) = self.apply_metadata(id, patch, None).await?;
        Ok(document)
    }

    async fn update_content(&self, id: DocumentId, content: &ContentUpdate) -> AppResult<Document> {
        let mut state = self.state.write().await;
        set_content(&mut state, id, content)?;
        state.document(id)
    }

    async fn set_approval(&self, id: DocumentId, approver: Option<UserId>) -> AppResult<Document> {
        let mut state = self.state.write().await;
        state.require_document(id)?;
        if let Some(approver) = approver {
            state.require_user(approver)?;
        }
        let row = state.row_mut(id)?;
        match approver {
            Some(approver) => {
                row.is_approved = true;
                row.approved_by = Some(approver);
                row.updated_at = Utc::now();
            }
            None if row.is_approved => {
                row.is_approved = false;
                row.approved_by = None;
                row.updated_at = Utc::now();
            }
            None => {}
        }
        state.document(id)
    }

    async fn delete(&self, id: DocumentId) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.require_document(id)?;
        state.documents.remove(&id);
        state.links.retain(|(doc, _)| *doc != id);
        Ok(())
    }
}

#[async_trait]
impl VersionLedger for MemoryDocumentStore {
    async fn next_version_number(&self, document_id: DocumentId) -> AppResult<i32> {
        Ok(self.state.read().await.next_version_number(document_id))
    }

    async fn append(&self, new: &NewVersion) -> AppResult<DocumentVersion> {
        let mut state = self.state.write().await;
        state.require_document(new.document_id)?;
        state.require_user(new.edited_by)?;
        Ok(state.push_version(new, Utc::now()))
    }

    async fn list_by_document(&self, document_id: DocumentId) -> AppResult<Vec<DocumentVersion>> {
        Ok(self.state.read().await.versions_of(document_id))
    }

    async fn find_version(&self, id: VersionId) -> AppResult<DocumentVersion> {
        self.state
            .read()
            .await
            .versions
            .get(&id)
            .cloned()
            .ok_or_else(|| version_not_found(id))
    }

    async fn latest(&self, document_id: DocumentId) -> AppResult<DocumentVersion> {
        self.state
            .read()
            .await
            .versions_of(document_id)
            .into_iter()
            .next()
            .ok_or_else(|| no_versions(document_id))
    }

    async fn by_document_and_number(
        &self,
        document_id: DocumentId,
        number: i32,
    ) -> AppResult<DocumentVersion> {
        self.state
            .read()
            .await
            .version_by_number(document_id, number)
    }

    async fn count(&self, document_id: DocumentId) -> AppResult<i64> {
        Ok(self
            .state
            .read()
            .await
            .versions
            .values()
            .filter(|v| v.document_id == document_id)
            .count() as i64)
    }

    async fn delete_all(&self, document_id: DocumentId) -> AppResult<u64> {
        Ok(self.state.write().await.remove_versions(document_id))
    }
}

/// Validate and insert a document row with its links. Returns the new ID.
fn insert_document(state: &mut MemoryState, new: &NewDocument) -> AppResult<DocumentId> {
    let categories = category_set(new.category_ids.iter().copied());
    state.require_user(new.uploaded_by)?;
    state.require_categories(&categories)?;
    if let Some(course_id) = new.course_id {
        state.require_course(course_id)?;
    }

    let now = Utc::now();
    let document = Document {
        id: DocumentId::new(),
        title: new.title.clone(),
        description: new.description.clone(),
        file_type: new.file_type,
        file_ref: new.file_ref.clone(),
        file_size: new.file_size,
        category_ids: Vec::new(),
        course_id: new.course_id,
        uploaded_by: new.uploaded_by,
        is_approved: false,
        approved_by: None,
        created_at: now,
        updated_at: now,
    };
    let id = document.id;
    state.documents.insert(id, document);
    state.replace_links(id, &categories);
    Ok(id)
}

/// Point a document at new content and revoke approval.
fn set_content(state: &mut MemoryState, id: DocumentId, content: &ContentUpdate) -> AppResult<()> {
    let row = state.row_mut(id)?;
    row.file_ref = content.file_ref.clone();
    row.file_size = content.file_size;
    row.file_type = content.file_type;
    row.is_approved = false;
    row.approved_by = None;
    row.updated_at = Utc::now();
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn create_with_initial_version(
        &self,
        new: &NewDocument,
        change_description: &str,
    ) -> AppResult<(Document, DocumentVersion)> {
        let mut state = self.state.write().await;
        let id = insert_document(&mut state, new)?;
        let version = state.push_version(
            &NewVersion {
                document_id: id,
                edited_by: new.uploaded_by,
                file_ref: new.file_ref.clone(),
                file_size: new.file_size,
                change_description: change_description.to_string(),
            },
            Utc::now(),
        );
        Ok((state.document(id)?, version))
    }

    async fn replace_content(
        &self,
        id: DocumentId,
        content: &ContentUpdate,
        edited_by: UserId,
        change_description: &str,
    ) -> AppResult<(Document, DocumentVersion)> {
        let mut state = self.state.write().await;
        state.require_document(id)?;
        state.require_user(edited_by)?;

        set_content(&mut state, id, content)?;
        let version = state.push_version(
            &NewVersion {
                document_id: id,
                edited_by,
                file_ref: content.file_ref.clone(),
                file_size: content.file_size,
                change_description: change_description.to_string(),
            },
            Utc::now(),
        );
        Ok((state.document(id)?, version))
    }

    async fn apply_metadata(
        &self,
        id: DocumentId,
        patch: &DocumentPatch,
        audit: Option<&MetadataAudit>,
    ) -> AppResult<(Document, Option<DocumentVersion>)> {
        let mut state = self.state.write().await;
        let current = state.document(id)?;

        let categories = patch
            .category_ids
            .as_ref()
            .map(|ids| category_set(ids.iter().copied()));
        if let Some(categories) = &categories {
            state.require_categories(categories)?;
        }
        if let Patch::Set(course_id) = patch.course_id {
            state.require_course(course_id)?;
        }
        let editor = audit.map(|a| a.edited_by.unwrap_or(current.uploaded_by));
        if let Some(editor) = editor {
            state.require_user(editor)?;
        }

        let now = Utc::now();
        let row = state.row_mut(id)?;
        if let Some(title) = patch.effective_title() {
            row.title = title.to_string();
        }
        if let Some(description) = &patch.description {
            row.description = Some(description.clone());
        }
        row.course_id = patch.course_id.clone().apply(row.course_id);
        row.updated_at = now;
        if let Some(categories) = &categories {
            state.replace_links(id, categories);
        }

        let version = match (audit, editor) {
            (Some(audit), Some(editor)) => Some(state.push_version(
                &NewVersion {
                    document_id: id,
                    edited_by: editor,
                    file_ref: current.file_ref.clone(),
                    file_size: current.file_size,
                    change_description: audit.change_description.clone(),
                },
                now,
            )),
            _ => None,
        };
        Ok((state.document(id)?, version))
    }

    async fn rollback(
        &self,
        id: DocumentId,
        number: i32,
        edited_by: UserId,
        change_description: &str,
    ) -> AppResult<(Document, DocumentVersion)> {
        let mut state = self.state.write().await;
        state.require_document(id)?;
        let target = state.version_by_number(id, number)?;
        state.require_user(edited_by)?;

        let content = ContentUpdate {
            file_type: FileType::from_file_name(&target.file_ref),
            file_ref: target.file_ref.clone(),
            file_size: target.file_size,
        };
        set_content(&mut state, id, &content)?;
        let version = state.push_version(
            &NewVersion {
                document_id: id,
                edited_by,
                file_ref: target.file_ref,
                file_size: target.file_size,
                change_description: change_description.to_string(),
            },
            Utc::now(),
        );
        Ok((state.document(id)?, version))
    }

    async fn purge(&self, id: DocumentId) -> AppResult<u64> {
        let mut state = self.state.write().await;
        state.require_document(id)?;
        let removed = state.remove_versions(id);
        state.documents.remove(&id);
        state.links.retain(|(doc, _)| *doc != id);
        Ok(removed)
    }
}
