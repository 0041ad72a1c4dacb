//! # docshare-service
//!
//! Business logic for the document lifecycle. Services coordinate the
//! blob store with the document store: blobs are written before any
//! database work and deleted best-effort after it.
//!
//! Services follow constructor injection; every dependency is an `Arc`
//! handed over at construction time.

pub mod document;

#[cfg(test)]
pub(crate) mod test_support;

pub use document::{DocumentService, UploadService, VersionService};
