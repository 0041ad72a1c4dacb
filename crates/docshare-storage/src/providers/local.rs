//! Local filesystem blob store.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::traits::blob::{BlobStore, StoredBlob};

use crate::keys::{key_from_reference, object_key};

/// Stores blobs as flat files under a root directory.
///
/// References are `{public_base_url}/{key}`; the API server mounts the
/// root directory at that URL.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored objects.
    root: PathBuf,
    /// URL prefix placed in front of every key.
    public_base_url: String,
}

impl LocalBlobStore {
    /// Create a store rooted at `root_path`, creating the directory.
    pub async fn new(root_path: &str, public_base_url: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Root directory on disk.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn reference_for(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn put(
        &self,
        data: Bytes,
        file_name: &str,
        _content_type: Option<&str>,
    ) -> AppResult<StoredBlob> {
        let key = object_key(file_name);
        let path = self.root.join(&key);

        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {key}"),
                e,
            )
        })?;

        debug!(key = %key, bytes = data.len(), "Stored blob on local filesystem");
        Ok(StoredBlob {
            reference: self.reference_for(&key),
            key,
            size_bytes: data.len() as u64,
        })
    }

    async fn delete(&self, reference: &str) -> AppResult<()> {
        let key = key_from_reference(reference).ok_or_else(|| {
            AppError::storage(format!("Reference does not name a stored blob: {reference}"))
        })?;
        match fs::remove_file(self.root.join(key)).await {
            Ok(()) => {
                debug!(key, "Deleted blob from local filesystem");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {key}"),
                e,
            )),
        }
    }
}
