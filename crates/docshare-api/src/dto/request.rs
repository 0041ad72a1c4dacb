//! Request DTOs with validation.
//!
//! Field names are snake_case; camelCase spellings are accepted as
//! aliases.

use serde::{Deserialize, Serialize};
use validator::Validate;

use docshare_core::types::Patch;
use docshare_core::types::id::{CategoryId, CourseId, UserId};
use docshare_entity::document::DocumentPatch;

/// JSON metadata update.
///
/// An absent `course_id` leaves the course unchanged; `null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMetadataRequest {
    /// New title.
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement category set.
    #[serde(default, alias = "categoryIds")]
    pub category_ids: Option<Vec<CategoryId>>,
    /// Course change.
    #[serde(default, alias = "courseId")]
    pub course_id: Patch<CourseId>,
    /// Editor recorded on the audit version.
    #[serde(default, alias = "userId")]
    pub user_id: Option<UserId>,
}

impl UpdateMetadataRequest {
    /// Split into the patch and the editor.
    pub fn into_parts(self) -> (DocumentPatch, Option<UserId>) {
        (
            DocumentPatch {
                title: self.title,
                description: self.description,
                category_ids: self.category_ids,
                course_id: self.course_id,
            },
            self.user_id,
        )
    }
}

/// Rollback request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RollbackRequest {
    /// Target version number.
    #[serde(alias = "versionNumber")]
    #[validate(range(min = 1, message = "Version number must be positive"))]
    pub version_number: i32,
    /// Editor recorded on the new version.
    #[serde(alias = "userId")]
    pub user_id: UserId,
}

/// `?approver_id=` for approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveParams {
    #[serde(alias = "approverId")]
    pub approver_id: UserId,
}

/// `?delete_all_versions=` for deletion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteParams {
    #[serde(default, alias = "deleteAllVersions")]
    pub delete_all_versions: bool,
}

/// `?keyword=` for title search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
}

/// `?limit=` for the recent listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentParams {
    pub limit: Option<u32>,
}
