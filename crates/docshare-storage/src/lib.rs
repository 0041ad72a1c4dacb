//! # docshare-storage
//!
//! [`BlobStore`](docshare_core::traits::BlobStore) providers for DocShare:
//! local filesystem, an HTTP object store speaking the Supabase Storage
//! REST dialect, and an in-memory store for tests. [`BlobStoreManager`]
//! picks one from configuration and bounds every call with a timeout.

pub mod keys;
pub mod manager;
pub mod providers;

pub use manager::BlobStoreManager;
