//! Storage key names for all EventHub session entries.
//!
//! Centralising key names prevents typos and makes it easy to find every
//! key the coordinator uses. The names match the persisted layout other
//! same-origin clients expect, so they are camelCase strings rather than
//! Rust-style identifiers.

// ── Tab-scoped keys ────────────────────────────────────────

/// Whether the tab holds an authenticated session (`"true"` when set).
pub const IS_AUTHENTICATED: &str = "isAuthenticated";

/// The validated role string.
pub const USER_ROLE: &str = "userRole";

/// The user's email address.
pub const USER_EMAIL: &str = "userEmail";

/// The backend user identifier.
pub const USER_ID: &str = "userId";

/// The user's display name.
pub const USER_NAME: &str = "userName";

/// RFC 3339 timestamp of when the session was established.
pub const LOGIN_TIME: &str = "loginTime";

/// The tab's session identifier, generated once per tab lifetime.
pub const SESSION_ID: &str = "sessionId";

/// The identity keys cleared when a tab session is destroyed. The session
/// id is deliberately not in this set: a tab owns exactly one id for its
/// whole lifetime, across logins.
pub const TAB_IDENTITY_KEYS: &[&str] = &[
    IS_AUTHENTICATED,
    USER_ROLE,
    USER_EMAIL,
    USER_ID,
    USER_NAME,
    LOGIN_TIME,
];

// ── Shared keys ────────────────────────────────────────────

/// The shared registry of all active sessions: a JSON object keyed by
/// session id.
pub const ACTIVE_SESSIONS: &str = "activeSessions";
