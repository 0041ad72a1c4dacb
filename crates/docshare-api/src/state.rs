//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use docshare_core::config::AppConfig;
use docshare_core::traits::blob::BlobStore;
use docshare_database::store::DocumentStore;
use docshare_service::{DocumentService, UploadService, VersionService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Document store (PostgreSQL or in-memory)
    pub store: Arc<dyn DocumentStore>,
    /// Blob store, already bounded by the storage timeout
    pub blobs: Arc<dyn BlobStore>,

    // ── Services ─────────────────────────────────────────────
    /// Upload and content replacement
    pub upload_service: Arc<UploadService>,
    /// Catalog queries, metadata, approval, deletion
    pub document_service: Arc<DocumentService>,
    /// Version history and rollback
    pub version_service: Arc<VersionService>,
}

impl AppState {
    /// Wire services over a store and a blob store.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&store),
            Arc::clone(&blobs),
            config.storage.clone(),
        ));
        let document_service = Arc::new(DocumentService::new(
            Arc::clone(&store),
            Arc::clone(&blobs),
            config.versioning.clone(),
        ));
        let version_service = Arc::new(VersionService::new(Arc::clone(&store)));

        Self {
            config: Arc::new(config),
            store,
            blobs,
            upload_service,
            document_service,
            version_service,
        }
    }
}
