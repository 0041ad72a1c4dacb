//! Document entity model.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use docshare_core::types::id::{CategoryId, CourseId, DocumentId, UserId};
use docshare_core::types::{Patch, SortDirection};
use docshare_core::AppError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::file_type::FileType;

/// A shareable document and its current state.
///
/// `file_ref` and `file_size` always mirror the highest-numbered version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// Title shown in listings.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Type tag derived from the current file's extension.
    pub file_type: FileType,
    /// Blob store reference of the current content.
    pub file_ref: String,
    /// Size of the current content in bytes.
    pub file_size: i64,
    /// Associated categories, sorted and unique.
    pub category_ids: Vec<CategoryId>,
    /// Associated course, if any.
    pub course_id: Option<CourseId>,
    /// The uploader. Never changes after creation.
    pub uploaded_by: UserId,
    /// Approval gate.
    pub is_approved: bool,
    /// Approver; present iff `is_approved`.
    pub approved_by: Option<UserId>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When any field last changed.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Check whether the document belongs to the given category.
    pub fn has_category(&self, category_id: CategoryId) -> bool {
        self.category_ids.binary_search(&category_id).is_ok()
    }

    /// Case-insensitive substring match on the title.
    pub fn title_matches(&self, keyword: &str) -> bool {
        self.title.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// Collapse a list of category IDs into the sorted, duplicate-free form
/// documents carry.
pub fn category_set(ids: impl IntoIterator<Item = CategoryId>) -> Vec<CategoryId> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Data required to create a new document record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Type tag of the uploaded file.
    pub file_type: FileType,
    /// Blob reference of the uploaded file.
    pub file_ref: String,
    /// Size of the uploaded file in bytes.
    pub file_size: i64,
    /// Uploader; must resolve in the directory.
    pub uploaded_by: UserId,
    /// Categories; every one must resolve.
    pub category_ids: Vec<CategoryId>,
    /// Optional course; must resolve when present.
    pub course_id: Option<CourseId>,
}

/// Partial metadata update.
///
/// `None` leaves a field unchanged. `category_ids`, when present, replaces
/// the whole association set. `course_id` distinguishes keep from clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPatch {
    /// New title; blank titles are ignored.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement category set.
    pub category_ids: Option<Vec<CategoryId>>,
    /// Course association change.
    #[serde(default)]
    pub course_id: Patch<CourseId>,
}

impl DocumentPatch {
    /// The title to apply, skipping absent or blank values.
    pub fn effective_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Replacement content pointer for a content update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentUpdate {
    /// New blob reference.
    pub file_ref: String,
    /// New size in bytes.
    pub file_size: i64,
    /// Type tag of the new file.
    pub file_type: FileType,
}

/// Columns a document page can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSortField {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Last update time.
    UpdatedAt,
    /// Title, alphabetical.
    Title,
    /// File size.
    FileSize,
}

impl DocumentSortField {
    /// Column name in the `documents` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
            Self::FileSize => "file_size",
        }
    }
}

impl fmt::Display for DocumentSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for DocumentSortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "updated_at" | "updatedAt" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            "file_size" | "fileSize" => Ok(Self::FileSize),
            other => Err(AppError::validation(format!(
                "Invalid sort field: '{other}'. Expected one of: created_at, updated_at, title, file_size"
            ))),
        }
    }
}

/// Ordering for paginated document listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentSort {
    /// Column to order by.
    pub field: DocumentSortField,
    /// Direction.
    pub direction: SortDirection,
}

impl DocumentSort {
    /// Compare two documents under this ordering, breaking ties by ID.
    pub fn compare(&self, a: &Document, b: &Document) -> std::cmp::Ordering {
        let primary = match self.field {
            DocumentSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            DocumentSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            DocumentSortField::Title => a.title.cmp(&b.title),
            DocumentSortField::FileSize => a.file_size.cmp(&b.file_size),
        };
        self.direction.apply(primary.then_with(|| a.id.cmp(&b.id)))
    }
}
