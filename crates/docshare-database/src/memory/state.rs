//! Plain data behind the in-memory store.
//!
//! Every method here runs under the store's lock. Mutating helpers are
//! only called after all checks for an operation have passed, so an
//! operation either applies completely or not at all.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use docshare_core::result::AppResult;
use docshare_core::types::id::{CategoryId, CourseId, DocumentId, UserId, VersionId};
use docshare_entity::directory::{Category, Course, UserRef};
use docshare_entity::document::{Document, DocumentSort, DocumentVersion, NewVersion};

use crate::store::errors::{
    course_not_found, document_not_found, ensure_all_categories, user_not_found,
    version_number_not_found,
};

#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    pub users: HashMap<UserId, UserRef>,
    pub categories: HashMap<CategoryId, Category>,
    pub courses: HashMap<CourseId, Course>,
    /// Document rows. `category_ids` is always empty here; `links` owns
    /// the associations.
    pub documents: HashMap<DocumentId, Document>,
    pub links: BTreeSet<(DocumentId, CategoryId)>,
    pub versions: HashMap<VersionId, DocumentVersion>,
}

impl MemoryState {
    /// Document row with its category set filled in from `links`.
    pub fn document(&self, id: DocumentId) -> AppResult<Document> {
        let row = self.documents.get(&id).ok_or_else(|| document_not_found(id))?;
        Ok(self.materialize(row))
    }

    pub fn materialize(&self, row: &Document) -> Document {
        let mut document = row.clone();
        document.category_ids = self
            .links
            .iter()
            .filter(|(doc, _)| *doc == row.id)
            .map(|(_, category)| *category)
            .collect();
        document
    }

    /// Documents matching `filter`, in the given order.
    pub fn select(
        &self,
        sort: &DocumentSort,
        filter: impl Fn(&Document) -> bool,
    ) -> Vec<Document> {
        let mut documents: Vec<Document> = self
            .documents
            .values()
            .map(|row| self.materialize(row))
            .filter(|doc| filter(doc))
            .collect();
        documents.sort_by(|a, b| sort.compare(a, b));
        documents
    }

    pub fn require_document(&self, id: DocumentId) -> AppResult<()> {
        if self.documents.contains_key(&id) {
            Ok(())
        } else {
            Err(document_not_found(id))
        }
    }

    pub fn require_user(&self, id: UserId) -> AppResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(user_not_found(id))
        }
    }

    pub fn require_course(&self, id: CourseId) -> AppResult<()> {
        if self.courses.contains_key(&id) {
            Ok(())
        } else {
            Err(course_not_found(id))
        }
    }

    /// `ids` must already be deduplicated.
    pub fn require_categories(&self, ids: &[CategoryId]) -> AppResult<()> {
        let found: Vec<Category> = ids
            .iter()
            .filter_map(|id| self.categories.get(id).cloned())
            .collect();
        ensure_all_categories(ids, &found)
    }

    pub fn replace_links(&mut self, id: DocumentId, categories: &[CategoryId]) {
        self.links.retain(|(doc, _)| *doc != id);
        self.links
            .extend(categories.iter().map(|category| (id, *category)));
    }

    pub fn versions_of(&self, document_id: DocumentId) -> Vec<DocumentVersion> {
        let mut versions: Vec<DocumentVersion> = self
            .versions
            .values()
            .filter(|v| v.document_id == document_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        versions
    }

    pub fn version_by_number(
        &self,
        document_id: DocumentId,
        number: i32,
    ) -> AppResult<DocumentVersion> {
        self.versions
            .values()
            .find(|v| v.document_id == document_id && v.version_number == number)
            .cloned()
            .ok_or_else(|| version_number_not_found(document_id, number))
    }

    /// Drop every version of a document, returning how many went.
    pub fn remove_versions(&mut self, document_id: DocumentId) -> u64 {
        let before = self.versions.len();
        self.versions.retain(|_, v| v.document_id != document_id);
        (before - self.versions.len()) as u64
    }

    pub fn next_version_number(&self, document_id: DocumentId) -> i32 {
        self.versions
            .values()
            .filter(|v| v.document_id == document_id)
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Allocate the next number and record the version.
    pub fn push_version(&mut self, new: &NewVersion, now: DateTime<Utc>) -> DocumentVersion {
        let version = DocumentVersion {
            id: VersionId::new(),
            document_id: new.document_id,
            version_number: self.next_version_number(new.document_id),
            file_ref: new.file_ref.clone(),
            file_size: new.file_size,
            edited_by: new.edited_by,
            change_description: new.change_description.clone(),
            created_at: now,
        };
        self.versions.insert(version.id, version.clone());
        version
    }

    /// Mutable access to a row already checked with `require_document`.
    pub fn row_mut(&mut self, id: DocumentId) -> AppResult<&mut Document> {
        self.documents
            .get_mut(&id)
            .ok_or_else(|| document_not_found(id))
    }
}
