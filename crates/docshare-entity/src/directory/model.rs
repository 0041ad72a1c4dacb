//! Directory records.

use chrono::{DateTime, Utc};
use docshare_core::types::id::{CategoryId, CourseId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user as seen by the document lifecycle: identity and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRef {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Display name.
    pub full_name: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// A document category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Unique category name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

/// A course documents can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Course {
    /// Unique course identifier.
    pub id: CourseId,
    /// Unique course code.
    pub code: String,
    /// Course title.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the course was created.
    pub created_at: DateTime<Utc>,
}
