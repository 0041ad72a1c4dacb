//! Core type definitions used across the DocShare workspace.

pub mod id;
pub mod pagination;
pub mod patch;
pub mod sorting;

pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use patch::Patch;
pub use sorting::SortDirection;
