//! Directory repository: users, categories and courses.

use chrono::Utc;
use sqlx::PgConnection;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::id::{CategoryId, CourseId, UserId};
use docshare_entity::directory::{Category, Course, UserRef};

use crate::store::errors::{course_not_found, ensure_all_categories, user_not_found};

/// Lookups and idempotent inserts for the directory tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryRepository;

impl DirectoryRepository {
    /// Find a user by ID.
    pub async fn find_user(conn: &mut PgConnection, id: UserId) -> AppResult<Option<UserRef>> {
        sqlx::query_as::<_, UserRef>("SELECT * FROM app_users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    /// Find a user or fail with NotFound.
    pub async fn require_user(conn: &mut PgConnection, id: UserId) -> AppResult<UserRef> {
        Self::find_user(conn, id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    /// Find the categories among `ids`.
    pub async fn find_categories(
        conn: &mut PgConnection,
        ids: &[CategoryId],
    ) -> AppResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find categories", e))
    }

    /// Fail unless every ID in the deduplicated `ids` resolves.
    pub async fn require_categories(conn: &mut PgConnection, ids: &[CategoryId]) -> AppResult<()> {
        let found = Self::find_categories(conn, ids).await?;
        ensure_all_categories(ids, &found)
    }

    /// Find a course by ID.
    pub async fn find_course(conn: &mut PgConnection, id: CourseId) -> AppResult<Option<Course>> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find course", e))
    }

    /// Find a course or fail with NotFound.
    pub async fn require_course(conn: &mut PgConnection, id: CourseId) -> AppResult<Course> {
        Self::find_course(conn, id)
            .await?
            .ok_or_else(|| course_not_found(id))
    }

    /// Insert a user unless the username is taken, then return the row.
    pub async fn ensure_user(
        conn: &mut PgConnection,
        username: &str,
        full_name: Option<&str>,
    ) -> AppResult<UserRef> {
        sqlx::query(
            "INSERT INTO app_users (id, username, full_name, created_at) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(UserId::new())
        .bind(username)
        .bind(full_name)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert user", e))?;

        sqlx::query_as::<_, UserRef>("SELECT * FROM app_users WHERE username = $1")
            .bind(username)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load user", e))
    }

    /// Insert a category unless the name is taken, then return the row.
    pub async fn ensure_category(
        conn: &mut PgConnection,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Category> {
        sqlx::query(
            "INSERT INTO categories (id, name, description, created_at) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(CategoryId::new())
        .bind(name)
        .bind(description)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert category", e))?;

        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE name = $1")
            .bind(name)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load category", e))
    }

    /// Insert a course unless the code is taken, then return the row.
    pub async fn ensure_course(
        conn: &mut PgConnection,
        code: &str,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Course> {
        sqlx::query(
            "INSERT INTO courses (id, code, name, description, created_at) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (code) DO NOTHING",
        )
        .bind(CourseId::new())
        .bind(code)
        .bind(name)
        .bind(description)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert course", e))?;

        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE code = $1")
            .bind(code)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load course", e))
    }
}
