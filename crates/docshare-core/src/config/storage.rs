//! Blob storage provider configuration.

use serde::{Deserialize, Serialize};

/// Top-level blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Provider: `"local"`, `"http"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Maximum upload size in bytes (default 50 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Timeout applied to every blob store call, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Local filesystem provider settings.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// HTTP object store provider settings.
    #[serde(default)]
    pub http: HttpStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            max_upload_size_bytes: default_max_upload(),
            timeout_seconds: default_timeout(),
            local: LocalStorageConfig::default(),
            http: HttpStorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for stored objects.
    #[serde(default = "default_local_root")]
    pub root_path: String,
    /// Public URL prefix the server mounts `root_path` under.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

/// HTTP object storage (Supabase Storage compatible) configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HttpStorageConfig {
    /// Service base URL, e.g. `https://project.supabase.co`.
    #[serde(default)]
    pub endpoint: String,
    /// Bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Service API key, sent as a bearer token.
    #[serde(default)]
    pub api_key: String,
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MB
}

fn default_timeout() -> u64 {
    30
}

fn default_local_root() -> String {
    "./data/blobs".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/files".to_string()
}
