//! Custom Axum extractors.
//!
//! Each wrapper delegates to the stock extractor and reports rejections
//! as a 400 in the standard response envelope.

pub mod json;
pub mod multipart;
pub mod pagination;
pub mod path;
pub mod query;

pub use json::ValidatedJson;
pub use multipart::DocumentForm;
pub use pagination::PageParams;
pub use path::ApiPath;
pub use query::ApiQuery;
