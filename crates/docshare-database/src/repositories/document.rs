//! Document repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::types::id::{CategoryId, CourseId, DocumentId, UserId};
use docshare_core::types::pagination::{PageRequest, PageResponse};
use docshare_core::types::Patch;
use docshare_entity::document::{ContentUpdate, Document, DocumentPatch, DocumentSort, NewDocument};

use crate::store::errors::{document_not_found, escape_like};

/// Document columns with the category set folded in from the join table.
const SELECT_DOCUMENT: &str = "SELECT d.id, d.title, d.description, d.file_type, d.file_ref, \
     d.file_size, \
     ARRAY(SELECT dc.category_id FROM document_categories dc \
           WHERE dc.document_id = d.id ORDER BY dc.category_id) AS category_ids, \
     d.course_id, d.uploaded_by, d.is_approved, d.approved_by, d.created_at, d.updated_at \
     FROM documents d";

/// Queries and writes against `documents` and `document_categories`.
///
/// Every function takes a connection so the same code runs on a pooled
/// connection or inside a transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRepository;

impl DocumentRepository {
    /// Find a document by ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: DocumentId) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>(&format!("{SELECT_DOCUMENT} WHERE d.id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    /// Find a document by ID or fail with NotFound.
    pub async fn get(conn: &mut PgConnection, id: DocumentId) -> AppResult<Document> {
        Self::find_by_id(conn, id)
            .await?
            .ok_or_else(|| document_not_found(id))
    }

    /// Lock the document row for the rest of the transaction.
    ///
    /// Every writer that allocates a version number goes through this
    /// lock, which serializes allocation per document.
    pub async fn lock(conn: &mut PgConnection, id: DocumentId) -> AppResult<()> {
        sqlx::query_scalar::<_, DocumentId>("SELECT id FROM documents WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock document", e))?
            .map(|_| ())
            .ok_or_else(|| document_not_found(id))
    }

    /// List documents, newest first, with an optional filter clause
    /// binding a single parameter.
    async fn list_where<T>(
        conn: &mut PgConnection,
        clause: &str,
        param: Option<T>,
        context: &'static str,
    ) -> AppResult<Vec<Document>>
    where
        T: for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send + 'static,
    {
        let sql = format!("{SELECT_DOCUMENT} {clause} ORDER BY d.created_at DESC, d.id DESC");
        let mut query = sqlx::query_as::<_, Document>(&sql);
        if let Some(param) = param {
            query = query.bind(param);
        }
        query
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, context, e))
    }

    /// All documents, newest first.
    pub async fn list_all(conn: &mut PgConnection) -> AppResult<Vec<Document>> {
        Self::list_where::<bool>(conn, "", None, "Failed to list documents").await
    }

    /// Documents uploaded by a user.
    pub async fn list_by_uploader(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> AppResult<Vec<Document>> {
        Self::list_where(
            conn,
            "WHERE d.uploaded_by = $1",
            Some(user_id),
            "Failed to list documents by uploader",
        )
        .await
    }

    /// Documents with the given approval state.
    pub async fn list_by_approval(
        conn: &mut PgConnection,
        approved: bool,
    ) -> AppResult<Vec<Document>> {
        Self::list_where(
            conn,
            "WHERE d.is_approved = $1",
            Some(approved),
            "Failed to list documents by approval",
        )
        .await
    }

    /// Documents associated with a category.
    pub async fn list_by_category(
        conn: &mut PgConnection,
        category_id: CategoryId,
    ) -> AppResult<Vec<Document>> {
        Self::list_where(
            conn,
            "WHERE EXISTS (SELECT 1 FROM document_categories dc \
             WHERE dc.document_id = d.id AND dc.category_id = $1)",
            Some(category_id),
            "Failed to list documents by category",
        )
        .await
    }

    /// Documents associated with a course.
    pub async fn list_by_course(
        conn: &mut PgConnection,
        course_id: CourseId,
    ) -> AppResult<Vec<Document>> {
        Self::list_where(
            conn,
            "WHERE d.course_id = $1",
            Some(course_id),
            "Failed to list documents by course",
        )
        .await
    }

    /// Case-insensitive substring search on titles.
    pub async fn search_by_title(
        conn: &mut PgConnection,
        keyword: &str,
    ) -> AppResult<Vec<Document>> {
        let pattern = format!("%{}%", escape_like(keyword));
        Self::list_where(
            conn,
            "WHERE d.title ILIKE $1 ESCAPE '\\'",
            Some(pattern),
            "Failed to search documents",
        )
        .await
    }

    /// The most recently created documents.
    pub async fn list_recent(conn: &mut PgConnection, limit: u32) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, Document>(&format!(
            "{SELECT_DOCUMENT} ORDER BY d.created_at DESC, d.id DESC LIMIT $1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list recent documents", e))
    }

    /// One page of documents. The sort column comes from a closed enum,
    /// never from raw input.
    pub async fn list_page(
        conn: &mut PgConnection,
        page: &PageRequest,
        sort: &DocumentSort,
    ) -> AppResult<PageResponse<Document>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count documents", e))?;

        let direction = sort.direction.as_sql();
        let documents = sqlx::query_as::<_, Document>(&format!(
            "{SELECT_DOCUMENT} ORDER BY d.{} {direction}, d.id {direction} LIMIT $1 OFFSET $2",
            sort.field.column()
        ))
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))?;

        Ok(PageResponse::new(documents, page, total as u64))
    }

    /// Insert a document row and its category links.
    pub async fn insert(
        conn: &mut PgConnection,
        id: DocumentId,
        new: &NewDocument,
        category_ids: &[CategoryId],
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO documents (id, title, description, file_type, file_ref, file_size, \
             course_id, uploaded_by, is_approved, approved_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, NULL, $9, $9)",
        )
        .bind(id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.file_type)
        .bind(&new.file_ref)
        .bind(new.file_size)
        .bind(new.course_id)
        .bind(new.uploaded_by)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create document", e))?;

        Self::link_categories(conn, id, category_ids).await
    }

    /// Replace the category set of a document.
    pub async fn replace_categories(
        conn: &mut PgConnection,
        id: DocumentId,
        category_ids: &[CategoryId],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM document_categories WHERE document_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear document categories", e)
            })?;
        Self::link_categories(conn, id, category_ids).await
    }

    async fn link_categories(
        conn: &mut PgConnection,
        id: DocumentId,
        category_ids: &[CategoryId],
    ) -> AppResult<()> {
        if category_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO document_categories (document_id, category_id) \
             SELECT $1, UNNEST($2::uuid[]) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(category_ids)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to link document categories", e)
        })?;
        Ok(())
    }

    /// Apply the scalar fields of a metadata patch. Categories are
    /// handled by [`Self::replace_categories`].
    pub async fn apply_patch(
        conn: &mut PgConnection,
        id: DocumentId,
        patch: &DocumentPatch,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let (touch_course, course_id) = match patch.course_id {
            Patch::Keep => (false, None),
            Patch::Clear => (true, None),
            Patch::Set(course_id) => (true, Some(course_id)),
        };
        let result = sqlx::query(
            "UPDATE documents SET title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             course_id = CASE WHEN $4 THEN $5 ELSE course_id END, \
             updated_at = $6 WHERE id = $1",
        )
        .bind(id)
        .bind(patch.effective_title())
        .bind(&patch.description)
        .bind(touch_course)
        .bind(course_id)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update document", e))?;

        if result.rows_affected() == 0 {
            return Err(document_not_found(id));
        }
        Ok(())
    }

    /// Point the document at new content and revoke approval.
    pub async fn set_content(
        conn: &mut PgConnection,
        id: DocumentId,
        content: &ContentUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE documents SET file_ref = $2, file_size = $3, file_type = $4, \
             is_approved = FALSE, approved_by = NULL, updated_at = $5 WHERE id = $1",
        )
        .bind(id)
        .bind(&content.file_ref)
        .bind(content.file_size)
        .bind(content.file_type)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update document content", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(document_not_found(id));
        }
        Ok(())
    }

    /// Approve with the given approver.
    pub async fn approve(
        conn: &mut PgConnection,
        id: DocumentId,
        approver: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE documents SET is_approved = TRUE, approved_by = $2, updated_at = $3 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(approver)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to approve document", e))?;

        if result.rows_affected() == 0 {
            return Err(document_not_found(id));
        }
        Ok(())
    }

    /// Revoke approval. Rows that are already unapproved are left untouched.
    pub async fn reject(conn: &mut PgConnection, id: DocumentId, now: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE documents SET is_approved = FALSE, approved_by = NULL, updated_at = $2 \
             WHERE id = $1 AND is_approved",
        )
        .bind(id)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reject document", e))?;
        Ok(())
    }

    /// Delete a document row. Category links go with it via cascade.
    pub async fn delete(conn: &mut PgConnection, id: DocumentId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete document", e))?;

        if result.rows_affected() == 0 {
            return Err(document_not_found(id));
        }
        Ok(())
    }
}
