//! Pure authorization decision consumed by protected views.

use eventhub_core::config::routes::RoutesConfig;
use eventhub_core::types::{IdentitySnapshot, Role};

/// The outcome of gating one view for one identity snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The view may render.
    Allow,
    /// The view must not render; send the user to `target`.
    DenyRedirect {
        /// Route to redirect to.
        target: String,
    },
}

/// Decides whether an identity may enter a protected view.
///
/// Pure over its inputs: the gate reads the snapshot it is handed and
/// never touches session state itself. "Not authenticated" redirects to
/// login; "wrong role" redirects to the user's landing route — never to
/// login, so a role mismatch cannot produce a login loop.
#[derive(Debug, Clone)]
pub struct RoleGate {
    routes: RoutesConfig,
}

impl RoleGate {
    /// Create a gate with the given route targets.
    pub fn new(routes: RoutesConfig) -> Self {
        Self { routes }
    }

    /// Decide access for `snapshot` against `allowed_roles`.
    ///
    /// An empty `allowed_roles` slice means the view is gated on
    /// authentication only.
    pub fn decide(&self, snapshot: &IdentitySnapshot, allowed_roles: &[Role]) -> GateDecision {
        if !snapshot.authenticated {
            return GateDecision::DenyRedirect {
                target: self.routes.login.clone(),
            };
        }

        if allowed_roles.is_empty() {
            return GateDecision::Allow;
        }

        match snapshot.role {
            Some(role) if allowed_roles.contains(&role) => GateDecision::Allow,
            role => GateDecision::DenyRedirect {
                target: self.landing_for(role),
            },
        }
    }

    /// The landing route for a role: admins go to the admin dashboard,
    /// everyone else to the default landing page.
    pub fn landing_for(&self, role: Option<Role>) -> String {
        match role {
            Some(Role::Admin) => self.routes.admin_landing.clone(),
            _ => self.routes.default_landing.clone(),
        }
    }
}

impl Default for RoleGate {
    fn default() -> Self {
        Self::new(RoutesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> RoleGate {
        RoleGate::default()
    }

    #[test]
    fn test_unauthenticated_goes_to_login() {
        let decision = gate().decide(&IdentitySnapshot::anonymous(), &[Role::Admin]);
        assert_eq!(
            decision,
            GateDecision::DenyRedirect {
                target: "/login".to_string()
            }
        );
    }

    #[test]
    fn test_empty_allow_list_gates_on_authentication_only() {
        let snapshot = IdentitySnapshot::authenticated(Role::User);
        assert_eq!(gate().decide(&snapshot, &[]), GateDecision::Allow);
    }

    #[test]
    fn test_matching_role_is_allowed() {
        let snapshot = IdentitySnapshot::authenticated(Role::Coordinator);
        assert_eq!(
            gate().decide(&snapshot, &[Role::Admin, Role::Coordinator]),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_wrong_role_lands_away_from_login() {
        let user = IdentitySnapshot::authenticated(Role::User);
        assert_eq!(
            gate().decide(&user, &[Role::Coordinator]),
            GateDecision::DenyRedirect {
                target: "/home".to_string()
            }
        );

        // An admin denied a coordinator-only view still lands on the
        // admin dashboard, not the login page.
        let admin = IdentitySnapshot::authenticated(Role::Admin);
        assert_eq!(
            gate().decide(&admin, &[Role::Coordinator]),
            GateDecision::DenyRedirect {
                target: "/admin".to_string()
            }
        );
    }
}
