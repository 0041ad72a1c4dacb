//! Version history policy.

use serde::{Deserialize, Serialize};

/// Controls which document changes append versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersioningConfig {
    /// Append an audit version (same file reference) after every
    /// metadata-only update.
    #[serde(default = "default_audit")]
    pub audit_metadata_updates: bool,
    /// Default number of documents returned by the "recent" listing.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            audit_metadata_updates: default_audit(),
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_audit() -> bool {
    true
}

fn default_recent_limit() -> u32 {
    10
}
