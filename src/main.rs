//! DocShare Server: document sharing backend with versioned uploads.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use docshare_core::config::AppConfig;
use docshare_core::error::{AppError, ErrorKind};
use docshare_core::traits::blob::BlobStore;
use docshare_database::{open_store, seed_directory};
use docshare_storage::BlobStoreManager;

#[tokio::main]
async fn main() {
    let env = std::env::var("DOCSHARE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DocShare v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Document store (connect + migrate) ───────────────
    let store = open_store(&config.database).await?;

    // ── Step 2: Seed directory data ──────────────────────────────
    if config.seed.enabled {
        let summary = seed_directory(store.as_ref(), &config.seed).await?;
        tracing::info!(
            users = summary.users,
            categories = summary.categories,
            courses = summary.courses,
            "Directory seeded"
        );
    }

    // ── Step 3: Blob store ───────────────────────────────────────
    let blobs = BlobStoreManager::from_config(&config.storage).await?;
    if !blobs.health_check().await.unwrap_or(false) {
        tracing::warn!(
            provider = %blobs.provider_type(),
            "Blob store is not reachable; uploads will fail until it is"
        );
    }
    let blobs: Arc<dyn BlobStore> = Arc::new(blobs);

    // ── Step 4: State + router ───────────────────────────────────
    let bind_address = config.server.bind_address();
    let state = docshare_api::AppState::new(config, store, blobs);
    let app = docshare_api::build_app(state);

    // ── Step 5: Serve ────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to bind {bind_address}"),
                e,
            )
        })?;
    tracing::info!(address = %bind_address, "DocShare listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    tracing::info!("DocShare shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
