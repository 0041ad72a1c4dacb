//! Best-effort blob removal.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use docshare_core::traits::blob::BlobStore;
use docshare_core::types::id::DocumentId;

/// Tally of one cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// References the blob store accepted for deletion.
    pub deleted: usize,
    /// References whose deletion failed and were left behind.
    pub failed: usize,
}

/// Deletes blobs without ever failing the caller.
///
/// Storage errors are logged at `warn` and counted. Database work that
/// follows a cleanup proceeds regardless.
#[derive(Debug, Clone)]
pub struct BlobCleanup {
    blobs: Arc<dyn BlobStore>,
}

impl BlobCleanup {
    /// Creates a cleanup helper over a blob store.
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Delete every distinct reference concurrently.
    pub async fn delete_all<I>(&self, document_id: DocumentId, references: I) -> CleanupReport
    where
        I: IntoIterator<Item = String>,
    {
        let references: BTreeSet<String> = references
            .into_iter()
            .filter(|r| !r.is_empty())
            .collect();

        let results = join_all(references.iter().map(|reference| async move {
            (reference, self.blobs.delete(reference).await)
        }))
        .await;

        let mut report = CleanupReport::default();
        for (reference, result) in results {
            match result {
                Ok(()) => {
                    debug!(document_id = %document_id, reference = %reference, "Blob deleted");
                    report.deleted += 1;
                }
                Err(e) => {
                    warn!(
                        document_id = %document_id,
                        reference = %reference,
                        error = %e,
                        "Failed to delete blob, continuing"
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FailingBlobStore;
    use bytes::Bytes;
    use docshare_storage::providers::MemoryBlobStore;

    #[tokio::test]
    async fn test_duplicates_are_deleted_once() {
        let blobs = MemoryBlobStore::new();
        let a = blobs.put(Bytes::from_static(b"a"), "a.pdf", None).await.unwrap();
        let b = blobs.put(Bytes::from_static(b"b"), "b.pdf", None).await.unwrap();

        let cleanup = BlobCleanup::new(Arc::new(blobs.clone()));
        let report = cleanup
            .delete_all(
                DocumentId::new(),
                vec![a.reference.clone(), b.reference.clone(), a.reference],
            )
            .await;

        assert_eq!(report, CleanupReport { deleted: 2, failed: 0 });
        assert!(blobs.is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_raised() {
        let cleanup = BlobCleanup::new(Arc::new(FailingBlobStore));
        let report = cleanup
            .delete_all(
                DocumentId::new(),
                vec!["memory://x.pdf".to_string(), "memory://y.pdf".to_string()],
            )
            .await;
        assert_eq!(report, CleanupReport { deleted: 0, failed: 2 });
    }
}
