//! Directory seed data applied at startup.

use serde::{Deserialize, Serialize};

/// Users, categories and courses inserted when missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Whether seeding runs at startup.
    #[serde(default)]
    pub enabled: bool,
    /// Users keyed by username.
    #[serde(default)]
    pub users: Vec<SeedUser>,
    /// Categories keyed by name.
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    /// Courses keyed by code.
    #[serde(default)]
    pub courses: Vec<SeedCourse>,
}

/// A seeded user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    /// Unique login name.
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
}

/// A seeded category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCategory {
    /// Unique category name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A seeded course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCourse {
    /// Unique course code, e.g. `CS101`.
    pub code: String,
    /// Course title.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}
