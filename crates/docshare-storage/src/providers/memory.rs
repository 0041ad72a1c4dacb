//! In-memory blob store.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::traits::blob::{BlobStore, StoredBlob};

use crate::keys::{key_from_reference, object_key};

const SCHEME: &str = "memory://";

/// Keeps blobs in a concurrent map. References look like `memory://{key}`.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<DashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored under a reference, if any.
    pub fn get(&self, reference: &str) -> Option<Bytes> {
        let key = key_from_reference(reference)?;
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    /// Whether a reference currently resolves.
    pub fn contains(&self, reference: &str) -> bool {
        self.get(reference).is_some()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(
        &self,
        data: Bytes,
        file_name: &str,
        _content_type: Option<&str>,
    ) -> AppResult<StoredBlob> {
        let key = object_key(file_name);
        let size_bytes = data.len() as u64;
        self.objects.insert(key.clone(), data);
        Ok(StoredBlob {
            reference: format!("{SCHEME}{key}"),
            key,
            size_bytes,
        })
    }

    async fn delete(&self, reference: &str) -> AppResult<()> {
        let key = key_from_reference(reference).ok_or_else(|| {
            AppError::storage(format!("Reference does not name a stored blob: {reference}"))
        })?;
        self.objects.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryBlobStore::new();
        let blob = store
            .put(Bytes::from_static(b"slides"), "deck.pptx", None)
            .await
            .unwrap();
        assert!(blob.reference.starts_with("memory://"));
        assert_eq!(store.get(&blob.reference).unwrap(), Bytes::from_static(b"slides"));

        store.delete(&blob.reference).await.unwrap();
        assert!(!store.contains(&blob.reference));
        store.delete(&blob.reference).await.unwrap();
        assert!(store.is_empty());
    }
}
