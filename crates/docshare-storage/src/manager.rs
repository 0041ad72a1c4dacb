//! Blob store manager: picks the configured provider and bounds every
//! call with the storage timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use docshare_core::config::StorageConfig;
use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::traits::blob::{BlobStore, StoredBlob};

use crate::providers::{HttpBlobStore, LocalBlobStore, MemoryBlobStore};

/// Front for the single active blob store.
#[derive(Debug, Clone)]
pub struct BlobStoreManager {
    inner: Arc<dyn BlobStore>,
    timeout: Duration,
}

impl BlobStoreManager {
    /// Build the provider named by `config.provider`.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn BlobStore> = match config.provider.as_str() {
            "local" => Arc::new(
                LocalBlobStore::new(&config.local.root_path, &config.local.public_base_url)
                    .await?,
            ),
            "http" => Arc::new(HttpBlobStore::new(&config.http)?),
            "memory" => Arc::new(MemoryBlobStore::new()),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: {other}"
                )));
            }
        };
        info!(provider = %inner.provider_type(), "Blob store initialized");
        Ok(Self::from_provider(
            inner,
            Duration::from_secs(config.timeout_seconds),
        ))
    }

    /// Wrap an existing provider.
    pub fn from_provider(inner: Arc<dyn BlobStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &Arc<dyn BlobStore> {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        action: &str,
        fut: impl std::future::Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::storage(format!(
                "Blob store {action} timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl BlobStore for BlobStoreManager {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.bounded("health check", self.inner.health_check()).await
    }

    async fn put(
        &self,
        data: Bytes,
        file_name: &str,
        content_type: Option<&str>,
    ) -> AppResult<StoredBlob> {
        self.bounded("upload", self.inner.put(data, file_name, content_type))
            .await
    }

    async fn delete(&self, reference: &str) -> AppResult<()> {
        self.bounded("delete", self.inner.delete(reference)).await
    }
}
