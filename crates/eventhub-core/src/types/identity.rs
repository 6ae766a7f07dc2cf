//! Identity types carried between the auth endpoints, the per-tab session,
//! and the cross-tab registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::Role;

/// The user object returned by the backend on successful login or
/// registration. The role arrives as a raw string and is coerced into
/// [`Role`] when the payload is consumed by a tab session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityPayload {
    /// Backend user identifier.
    pub id: String,
    /// The user's email address.
    pub email: String,
    /// Display name assembled by the backend.
    #[serde(default)]
    pub full_name: String,
    /// Raw role string as stored by the backend.
    pub role: String,
    /// Contact number, if the backend supplied one.
    #[serde(default)]
    pub mobile: Option<String>,
}

/// A tab's full authenticated identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Session identifier owned by the tab for its whole lifetime.
    pub session_id: String,
    /// Backend user identifier.
    pub user_id: String,
    /// Validated role.
    pub role: Role,
    /// The user's email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// When the identity was established.
    pub login_time: DateTime<Utc>,
}

/// The per-session summary published into the shared registry.
///
/// Serialized camelCase so the shared `activeSessions` value keeps the
/// layout other clients of the same origin expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySummary {
    /// The owning tab's session identifier.
    pub session_id: String,
    /// Validated role.
    pub role: Role,
    /// The user's email address.
    pub email: String,
    /// When the identity was established.
    pub login_time: DateTime<Utc>,
}

impl From<&Identity> for IdentitySummary {
    fn from(identity: &Identity) -> Self {
        Self {
            session_id: identity.session_id.clone(),
            role: identity.role,
            email: identity.email.clone(),
            login_time: identity.login_time,
        }
    }
}

/// A read-only view of a tab's authentication state, consumed by route
/// guards. Producing a snapshot never mutates session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentitySnapshot {
    /// Whether the tab currently holds a valid session.
    pub authenticated: bool,
    /// The validated role, when authenticated.
    pub role: Option<Role>,
}

impl IdentitySnapshot {
    /// Snapshot for a tab with no valid session.
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            role: None,
        }
    }

    /// Snapshot for an authenticated tab with the given role.
    pub fn authenticated(role: Role) -> Self {
        Self {
            authenticated: true,
            role: Some(role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = IdentitySummary {
            session_id: "1700000000000-abc".to_string(),
            role: Role::Coordinator,
            email: "c1@x.test".to_string(),
            login_time: Utc::now(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["sessionId"], "1700000000000-abc");
        assert_eq!(json["role"], "coordinator");
        assert!(json.get("loginTime").is_some());
    }

    #[test]
    fn test_payload_tolerates_missing_optional_fields() {
        let payload: IdentityPayload = serde_json::from_str(
            r#"{"id":"u1","email":"a@x.test","role":"user"}"#,
        )
        .unwrap();
        assert_eq!(payload.full_name, "");
        assert!(payload.mobile.is_none());
    }
}
