//! Key-value storage provider configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage provider type: `"memory"` or `"disabled"`.
    ///
    /// `"disabled"` models an environment where the underlying storage is
    /// unavailable; every component must keep functioning in degraded
    /// (single-tab, TTL-only) mode.
    #[serde(default = "default_provider")]
    pub provider: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}
