//! HTTP object store speaking the Supabase Storage REST API.
//!
//! Upload:  `POST   {endpoint}/storage/v1/object/{bucket}/{key}`
//! Delete:  `DELETE {endpoint}/storage/v1/object/{bucket}/{key}`
//! Public:  `{endpoint}/storage/v1/object/public/{bucket}/{key}`

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use docshare_core::config::HttpStorageConfig;
use docshare_core::error::{AppError, ErrorKind};
use docshare_core::result::AppResult;
use docshare_core::traits::blob::{BlobStore, StoredBlob};

use crate::keys::{key_from_reference, object_key};

/// Remote bucket reached over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    client: Client,
    endpoint: String,
    bucket: String,
    api_key: String,
}

impl HttpBlobStore {
    /// Create a store from configuration.
    pub fn new(config: &HttpStorageConfig) -> AppResult<Self> {
        let client = Client::builder().build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;
        Ok(Self::with_client(client, config))
    }

    /// Create a store using an existing client.
    pub fn with_client(client: Client, config: &HttpStorageConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{key}", self.endpoint, self.bucket)
    }

    /// Public URL for a stored key.
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{key}",
            self.endpoint, self.bucket
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            request
        } else {
            request
                .bearer_auth(&self.api_key)
                .header("apikey", &self.api_key)
        }
    }
}

fn transport_error(action: &str, e: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Storage,
        format!("Blob store {action} request failed: {e}"),
        e,
    )
}

async fn status_error(action: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    AppError::storage(format!(
        "Blob store {action} returned {status}: {}",
        body.chars().take(200).collect::<String>()
    ))
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn health_check(&self) -> AppResult<bool> {
        let url = format!("{}/storage/v1/bucket/{}", self.endpoint, self.bucket);
        match self.authorized(self.client.get(&url)).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                warn!(error = %e, "Blob store health check failed");
                Ok(false)
            }
        }
    }

    async fn put(
        &self,
        data: Bytes,
        file_name: &str,
        content_type: Option<&str>,
    ) -> AppResult<StoredBlob> {
        let key = object_key(file_name);
        let size_bytes = data.len() as u64;
        let response = self
            .authorized(self.client.post(self.object_url(&key)))
            .header(
                reqwest::header::CONTENT_TYPE,
                content_type.unwrap_or("application/octet-stream"),
            )
            .body(data)
            .send()
            .await
            .map_err(|e| transport_error("upload", e))?;

        if !response.status().is_success() {
            return Err(status_error("upload", response).await);
        }

        debug!(key = %key, bytes = size_bytes, bucket = %self.bucket, "Uploaded blob");
        Ok(StoredBlob {
            reference: self.public_url(&key),
            key,
            size_bytes,
        })
    }

    async fn delete(&self, reference: &str) -> AppResult<()> {
        let key = key_from_reference(reference).ok_or_else(|| {
            AppError::storage(format!("Reference does not name a stored blob: {reference}"))
        })?;
        let response = self
            .authorized(self.client.delete(self.object_url(key)))
            .send()
            .await
            .map_err(|e| transport_error("delete", e))?;

        match response.status() {
            s if s.is_success() => {
                debug!(key, bucket = %self.bucket, "Deleted blob");
                Ok(())
            }
            StatusCode::NOT_FOUND => Ok(()),
            _ => Err(status_error("delete", response).await),
        }
    }
}
