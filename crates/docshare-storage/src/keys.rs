//! Object key and reference helpers shared by the providers.

use uuid::Uuid;

/// Fresh object key: a random UUID plus the original file's extension,
/// lowercased. Names without an extension get a bare UUID.
pub fn object_key(file_name: &str) -> String {
    let id = Uuid::new_v4();
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() && is_safe_extension(ext) => {
            format!("{id}.{}", ext.to_ascii_lowercase())
        }
        _ => id.to_string(),
    }
}

fn is_safe_extension(ext: &str) -> bool {
    ext.len() <= 16 && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Extract the object key (last path segment) from a reference produced
/// by a provider. Returns `None` for references that cannot name an
/// object inside the store.
pub fn key_from_reference(reference: &str) -> Option<&str> {
    let without_query = reference.split(['?', '#']).next().unwrap_or(reference);
    let key = without_query.rsplit('/').next()?;
    is_valid_key(key).then_some(key)
}

/// Keys are single path segments: no separators, no dot-dot.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\'])
}
