//! Route targets used by guard redirects.

use serde::{Deserialize, Serialize};

/// Where route guards send users who are denied access.
///
/// An unauthenticated user always goes to `login`. A user with the wrong
/// role goes to their landing route, never back to `login`, so that a
/// role mismatch cannot produce a login loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Unauthenticated entry point.
    #[serde(default = "default_login")]
    pub login: String,
    /// Landing route for administrators.
    #[serde(default = "default_admin_landing")]
    pub admin_landing: String,
    /// Landing route for everyone else.
    #[serde(default = "default_landing")]
    pub default_landing: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login: default_login(),
            admin_landing: default_admin_landing(),
            default_landing: default_landing(),
        }
    }
}

fn default_login() -> String {
    "/login".to_string()
}

fn default_admin_landing() -> String {
    "/admin".to_string()
}

fn default_landing() -> String {
    "/home".to_string()
}
