//! Session lifetime and monitoring configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Absolute session time-to-live in hours. A session older than this
    /// is forcibly expired regardless of activity.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Interval of the monitor's liveness tick in seconds.
    #[serde(default = "default_liveness_interval")]
    pub liveness_interval_seconds: u64,
}

impl SessionConfig {
    /// The session TTL as a `chrono` duration.
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours as i64)
    }

    /// The liveness tick interval as a std duration.
    pub fn liveness_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.liveness_interval_seconds)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            liveness_interval_seconds: default_liveness_interval(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_liveness_interval() -> u64 {
    30
}
