//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the event-registration system.
///
/// The set is closed. Role strings received from the backend are mapped
/// into this enum before they reach any authorization decision; anything
/// outside the set collapses to [`Role::User`] via [`Role::coerce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access (manage events, users, reports).
    Admin,
    /// Can create and manage events and view registrations.
    Coordinator,
    /// Regular attendee: browse events, book, view own bookings.
    User,
}

impl Role {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::Coordinator => 2,
            Self::User => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &Role) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Map an externally supplied role string into the closed set.
    ///
    /// Unknown or malformed values collapse to [`Role::User`] so that a
    /// tampered role string can never grant elevated privileges.
    pub fn coerce(raw: &str) -> Role {
        raw.parse().unwrap_or(Role::User)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Coordinator => "coordinator",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = crate::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "coordinator" => Ok(Self::Coordinator),
            "user" => Ok(Self::User),
            _ => Err(crate::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: admin, coordinator, user"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(Role::Admin.has_at_least(&Role::User));
        assert!(Role::Admin.has_at_least(&Role::Admin));
        assert!(Role::Coordinator.has_at_least(&Role::User));
        assert!(!Role::User.has_at_least(&Role::Coordinator));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("COORDINATOR".parse::<Role>().unwrap(), Role::Coordinator);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_coerce_collapses_unknown_to_user() {
        assert_eq!(Role::coerce("admin"), Role::Admin);
        assert_eq!(Role::coerce("coordinator"), Role::Coordinator);
        assert_eq!(Role::coerce("root"), Role::User);
        assert_eq!(Role::coerce(""), Role::User);
        assert_eq!(Role::coerce("admin; drop"), Role::User);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"coordinator\"").unwrap(),
            Role::Coordinator
        );
    }
}
