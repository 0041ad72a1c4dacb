//! Document version repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::id::{DocumentId, VersionId};
use docshare_entity::document::{DocumentVersion, NewVersion};

/// Append-only access to `document_versions`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionRepository;

impl VersionRepository {
    /// Next number for a document. Only meaningful while the document
    /// row is locked by the caller's transaction.
    pub async fn next_number(conn: &mut PgConnection, document_id: DocumentId) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(version_number), 0) + 1 FROM document_versions \
             WHERE document_id = $1",
        )
        .bind(document_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute next version number", e)
        })
    }

    /// Insert a version with an already allocated number.
    pub async fn insert(
        conn: &mut PgConnection,
        new: &NewVersion,
        version_number: i32,
        now: DateTime<Utc>,
    ) -> AppResult<DocumentVersion> {
        sqlx::query_as::<_, DocumentVersion>(
            "INSERT INTO document_versions (id, document_id, version_number, file_ref, file_size, \
             edited_by, change_description, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(VersionId::new())
        .bind(new.document_id)
        .bind(version_number)
        .bind(&new.file_ref)
        .bind(new.file_size)
        .bind(new.edited_by)
        .bind(&new.change_description)
        .bind(now)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            let duplicate = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
            if duplicate {
                AppError::with_source(
                    ErrorKind::Conflict,
                    format!(
                        "Version {version_number} already exists for document ID: {}",
                        new.document_id
                    ),
                    e,
                )
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create document version", e)
            }
        })
    }

    /// Versions of a document, newest first.
    pub async fn list_by_document(
        conn: &mut PgConnection,
        document_id: DocumentId,
    ) -> AppResult<Vec<DocumentVersion>> {
        sqlx::query_as::<_, DocumentVersion>(
            "SELECT * FROM document_versions WHERE document_id = $1 ORDER BY version_number DESC",
        )
        .bind(document_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))
    }

    /// Find a version by ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: VersionId,
    ) -> AppResult<Option<DocumentVersion>> {
        sqlx::query_as::<_, DocumentVersion>("SELECT * FROM document_versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    /// Highest-numbered version of a document.
    pub async fn find_latest(
        conn: &mut PgConnection,
        document_id: DocumentId,
    ) -> AppResult<Option<DocumentVersion>> {
        sqlx::query_as::<_, DocumentVersion>(
            "SELECT * FROM document_versions WHERE document_id = $1 \
             ORDER BY version_number DESC LIMIT 1",
        )
        .bind(document_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find latest version", e))
    }

    /// Version `number` of a document.
    pub async fn find_by_number(
        conn: &mut PgConnection,
        document_id: DocumentId,
        number: i32,
    ) -> AppResult<Option<DocumentVersion>> {
        sqlx::query_as::<_, DocumentVersion>(
            "SELECT * FROM document_versions WHERE document_id = $1 AND version_number = $2",
        )
        .bind(document_id)
        .bind(number)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    /// Count versions of a document.
    pub async fn count(conn: &mut PgConnection, document_id: DocumentId) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM document_versions WHERE document_id = $1")
            .bind(document_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count versions", e))
    }

    /// Delete every version of a document.
    pub async fn delete_all(conn: &mut PgConnection, document_id: DocumentId) -> AppResult<u64> {
        sqlx::query("DELETE FROM document_versions WHERE document_id = $1")
            .bind(document_id)
            .execute(&mut *conn)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete versions", e))
    }
}
