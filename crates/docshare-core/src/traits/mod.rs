//! Core traits defined in `docshare-core` and implemented by other crates.

pub mod blob;

pub use blob::{BlobStore, StoredBlob};
