//! Pagination and ordering query parameters.

use serde::{Deserialize, Serialize};

use docshare_core::result::AppResult;
use docshare_core::types::SortDirection;
use docshare_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};
use docshare_entity::document::{DocumentSort, DocumentSortField};

/// Query parameters for the paginated document listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 10, max: 100).
    #[serde(default = "default_size", alias = "page_size", alias = "pageSize")]
    pub size: u64,
    /// Sort field (default: `created_at`).
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default: `desc`).
    pub direction: Option<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
            sort_by: None,
            direction: None,
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PageParams {
    /// Converts to a clamped `PageRequest` and a parsed ordering.
    pub fn into_parts(self) -> AppResult<(PageRequest, DocumentSort)> {
        let field = match self.sort_by.as_deref().map(str::trim) {
            None | Some("") => DocumentSortField::default(),
            Some(s) => s.parse()?,
        };
        let direction = match self.direction.as_deref().map(str::trim) {
            None | Some("") => SortDirection::default(),
            Some(s) => s.parse()?,
        };
        Ok((
            PageRequest::new(self.page, self.size),
            DocumentSort { field, direction },
        ))
    }
}
