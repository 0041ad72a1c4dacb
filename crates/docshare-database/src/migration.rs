//! Database migration runner.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use docshare_core::error::{AppError, ErrorKind};

/// Migrations embedded from the workspace `migrations/` directory.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every pending migration to the document store schema.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(
        known = MIGRATOR.iter().count(),
        "Applying document store migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Document store schema is up to date");
    Ok(())
}
