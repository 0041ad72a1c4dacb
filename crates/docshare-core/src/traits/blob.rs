//! Blob store trait for the external object storage collaborator.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Result of a successful [`BlobStore::put`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredBlob {
    /// Stable public reference (URL or key) for the stored bytes.
    pub reference: String,
    /// Object key inside the provider.
    pub key: String,
    /// Number of bytes stored.
    pub size_bytes: u64,
}

/// Opaque byte storage reached by reference.
///
/// Implementations live in `docshare-storage`. Both operations fail with
/// an `ErrorKind::Storage` error on I/O or remote-service failures.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "http").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store a payload and return its reference.
    ///
    /// `file_name` is the client-supplied name; providers only use its
    /// extension when deriving the object key.
    async fn put(
        &self,
        data: Bytes,
        file_name: &str,
        content_type: Option<&str>,
    ) -> AppResult<StoredBlob>;

    /// Delete the object behind a reference previously returned by `put`.
    ///
    /// Deleting a reference that no longer exists succeeds.
    async fn delete(&self, reference: &str) -> AppResult<()>;
}
