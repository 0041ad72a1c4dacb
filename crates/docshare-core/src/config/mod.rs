//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section has defaults so a missing file still
//! yields a runnable in-memory setup.

pub mod app;
pub mod database;
pub mod logging;
pub mod seed;
pub mod storage;
pub mod versioning;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::seed::{SeedCategory, SeedConfig, SeedCourse, SeedUser};
pub use self::storage::{HttpStorageConfig, LocalStorageConfig, StorageConfig};
pub use self::versioning::VersioningConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Document store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Version history policy.
    #[serde(default)]
    pub versioning: VersioningConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Directory seed data.
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml`, an environment-specific overlay
    /// `config/{env}.toml`, and environment variables prefixed with
    /// `DOCSHARE__` (e.g. `DOCSHARE__DATABASE__URL`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DOCSHARE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject provider combinations that cannot start.
    pub fn validate(&self) -> Result<(), AppError> {
        match self.database.provider.as_str() {
            "memory" => {}
            "postgres" => {
                if self.database.url.trim().is_empty() {
                    return Err(AppError::configuration(
                        "database.url is required when database.provider = \"postgres\"",
                    ));
                }
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown database provider: '{other}'"
                )));
            }
        }

        match self.storage.provider.as_str() {
            "local" | "memory" => {}
            "http" => {
                if self.storage.http.endpoint.trim().is_empty()
                    || self.storage.http.bucket.trim().is_empty()
                {
                    return Err(AppError::configuration(
                        "storage.http.endpoint and storage.http.bucket are required when storage.provider = \"http\"",
                    ));
                }
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: '{other}'"
                )));
            }
        }

        if self.storage.timeout_seconds == 0 {
            return Err(AppError::configuration(
                "storage.timeout_seconds must be greater than zero",
            ));
        }

        Ok(())
    }
}
