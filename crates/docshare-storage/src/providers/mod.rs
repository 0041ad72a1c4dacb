//! Blob store provider implementations.

pub mod http;
pub mod local;
pub mod memory;

pub use http::HttpBlobStore;
pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;
