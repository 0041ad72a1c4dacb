//! Document file-type classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of file types a document can carry.
///
/// Derived from the file name extension whenever content is uploaded or
/// replaced. Classification never fails: anything unrecognized is
/// [`FileType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    /// Portable Document Format.
    Pdf,
    /// Word processor documents (`.doc`, `.docx`).
    Word,
    /// Slide decks (`.ppt`, `.pptx`).
    Powerpoint,
    /// Any other extension, or none.
    Other,
}

impl FileType {
    /// Map an extension (without the dot, any case) to a file type.
    pub fn classify(extension: &str) -> Self {
        match extension.trim().to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" => Self::Word,
            "ppt" | "pptx" => Self::Powerpoint,
            _ => Self::Other,
        }
    }

    /// Classify a file name, path or URL by its extension.
    pub fn from_file_name(name: &str) -> Self {
        extension_of(name).map_or(Self::Other, |ext| Self::classify(&ext))
    }

    /// Return the tag as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Word => "WORD",
            Self::Powerpoint => "POWERPOINT",
            Self::Other => "OTHER",
        }
    }
}

/// Lowercased extension of the last path segment, ignoring any query
/// string or fragment. `None` when there is no extension.
pub fn extension_of(name: &str) -> Option<String> {
    let without_query = name.split(['?', '#']).next().unwrap_or(name);
    let segment = without_query
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_query);
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = docshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PDF" => Ok(Self::Pdf),
            "WORD" => Ok(Self::Word),
            "POWERPOINT" => Ok(Self::Powerpoint),
            "OTHER" => Ok(Self::Other),
            _ => Err(docshare_core::AppError::validation(format!(
                "Invalid file type: '{s}'. Expected one of: PDF, WORD, POWERPOINT, OTHER"
            ))),
        }
    }
}
