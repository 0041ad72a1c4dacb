//! Multipart form shared by upload and the multipart update.
//!
//! Field names are matched in snake_case or camelCase. `category_ids`
//! may be repeated, comma-separated, or both.

use std::str::FromStr;

use axum::extract::{FromRequest, Multipart, Request};
use bytes::Bytes;

use docshare_core::types::Patch;
use docshare_core::types::id::{CategoryId, CourseId, UserId};
use docshare_service::document::FilePayload;

use crate::error::ApiError;

/// Name used when the file part carries no file name.
const UNNAMED_FILE: &str = "upload";

/// Every field a document form may carry.
#[derive(Debug, Clone, Default)]
pub struct DocumentForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<UserId>,
    /// `None` when no `category_ids` part was sent.
    pub category_ids: Option<Vec<CategoryId>>,
    /// Absent part: keep. Empty part: clear.
    pub course_id: Patch<CourseId>,
    pub change_description: Option<String>,
    pub file: Option<FilePayload>,
}

impl<S> FromRequest<S> for DocumentForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::bad_request(format!("Invalid multipart body: {}", rejection.body_text()))
            })?;
        Self::read(multipart).await
    }
}

impl DocumentForm {
    /// Consume every part of a multipart body.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Multipart error: {e}")))?
        {
            let name = canonical_name(field.name().unwrap_or_default());

            if name == "file" {
                let file_name = field.file_name().unwrap_or(UNNAMED_FILE).to_string();
                let content_type = field.content_type().map(String::from);
                let data: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Read error: {e}")))?;
                form.file = Some(FilePayload {
                    file_name,
                    content_type,
                    data,
                });
                continue;
            }

            let text = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("Read error: {e}")))?;

            match name.as_str() {
                "title" => form.title = Some(text),
                "description" => form.description = Some(text),
                "change_description" => form.change_description = Some(text),
                "user_id" => form.user_id = Some(parse_id(&text, "user_id")?),
                "category_ids" => {
                    let ids = form.category_ids.get_or_insert_with(Vec::new);
                    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                        ids.push(parse_id(part, "category_ids")?);
                    }
                }
                "course_id" => {
                    form.course_id = match text.trim() {
                        "" => Patch::Clear,
                        value => Patch::Set(parse_id(value, "course_id")?),
                    };
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// The uploader or editor, which this form must carry.
    pub fn require_user(&self) -> Result<UserId, ApiError> {
        self.user_id
            .ok_or_else(|| ApiError::bad_request("user_id is required"))
    }
}

fn parse_id<T: FromStr>(value: &str, field: &str) -> Result<T, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {field}: {value}")))
}

/// `categoryIds[]` -> `category_ids`.
fn canonical_name(name: &str) -> String {
    let name = name.trim_end_matches("[]");
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("categoryIds"), "category_ids");
        assert_eq!(canonical_name("category_ids[]"), "category_ids");
        assert_eq!(canonical_name("changeDescription"), "change_description");
        assert_eq!(canonical_name("title"), "title");
    }

    #[test]
    fn test_parse_id() {
        let id = UserId::new();
        let parsed: UserId = parse_id(&format!(" {id} "), "user_id").unwrap();
        assert_eq!(parsed, id);
        assert!(parse_id::<UserId>("42", "user_id").is_err());
    }
}
