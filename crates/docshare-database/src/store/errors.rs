//! Error messages shared by every backend, so both report identical text.

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::types::id::{CategoryId, CourseId, DocumentId, UserId, VersionId};
use docshare_entity::directory::Category;

pub fn document_not_found(id: DocumentId) -> AppError {
    AppError::not_found(format!("Document not found with ID: {id}"))
}

pub fn user_not_found(id: UserId) -> AppError {
    AppError::not_found(format!("User not found with ID: {id}"))
}

pub fn course_not_found(id: CourseId) -> AppError {
    AppError::not_found(format!("Course not found with ID: {id}"))
}

pub fn version_not_found(id: VersionId) -> AppError {
    AppError::not_found(format!("Document version not found with ID: {id}"))
}

pub fn version_number_not_found(document_id: DocumentId, number: i32) -> AppError {
    AppError::not_found(format!(
        "Version {number} not found for document ID: {document_id}"
    ))
}

pub fn no_versions(document_id: DocumentId) -> AppError {
    AppError::not_found(format!("No versions found for document ID: {document_id}"))
}

/// Fail unless every requested (deduplicated) category was found.
pub fn ensure_all_categories(requested: &[CategoryId], found: &[Category]) -> AppResult<()> {
    if found.len() == requested.len() {
        return Ok(());
    }
    let missing: Vec<String> = requested
        .iter()
        .filter(|id| !found.iter().any(|c| c.id == **id))
        .map(ToString::to_string)
        .collect();
    Err(AppError::not_found(format!(
        "One or more categories not found: {}",
        missing.join(", ")
    )))
}

/// Escape `%`, `_` and `\` so a keyword matches literally inside `LIKE`.
pub fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
