//! Store selection from configuration.

use std::sync::Arc;

use tracing::info;

use docshare_core::config::DatabaseConfig;
use docshare_core::error::AppError;
use docshare_core::result::AppResult;

use crate::connection::connect_pool;
use crate::memory::MemoryDocumentStore;
use crate::migration::run_migrations;
use crate::repositories::PgDocumentStore;
use crate::store::DocumentStore;

/// Build the document store named by `database.provider`.
///
/// For `"postgres"` this connects the pool and, unless disabled, applies
/// pending migrations.
pub async fn open_store(config: &DatabaseConfig) -> AppResult<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.provider.as_str() {
        "postgres" => {
            let pool = connect_pool(config).await?;
            if config.run_migrations {
                run_migrations(&pool).await?;
            }
            info!("Using PostgreSQL document store");
            Arc::new(PgDocumentStore::new(pool))
        }
        "memory" => {
            info!("Using in-memory document store; data is lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            )));
        }
    };
    Ok(store)
}
