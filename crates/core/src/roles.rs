//! Role vocabulary and the authorization policy.
//!
//! Roles are disjoint: no role implies access to another role's operations.
//! The policy is a single pure function so every gated operation goes through
//! the same decision logic instead of per-handler checks.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Well-known role name constants.
///
/// These must match the CHECK constraint on `users.role` in
/// `20260301000001_create_users.sql`.
pub const ROLE_ENGINEER: &str = "engineer";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_VIEWER: &str = "viewer";

/// A user's role. Fixed at registration; there is no update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Creates and works assigned defects and tasks.
    Engineer,
    /// Creates projects and tasks, assigns defects to engineers.
    Manager,
    /// Read-only access to progress and analytics.
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Engineer, Role::Manager, Role::Viewer];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Engineer => ROLE_ENGINEER,
            Role::Manager => ROLE_MANAGER,
            Role::Viewer => ROLE_VIEWER,
        }
    }

    /// Parse a stored role name. Returns `None` for anything outside the
    /// vocabulary.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            ROLE_ENGINEER => Some(Role::Engineer),
            ROLE_MANAGER => Some(Role::Manager),
            ROLE_VIEWER => Some(Role::Viewer),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved identity of the current request, supplied by the session
/// layer (JWT claims in the HTTP host).
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: DbId,
    pub username: String,
    pub role: Role,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthzDecision {
    /// Authenticated and the role matches exactly.
    Pass,
    /// No authenticated identity; the host should send the caller to login.
    RedirectLogin,
    /// Authenticated, but the role does not match.
    Denied,
}

/// Decide whether `identity` may perform an operation gated on `required`.
pub fn authorize(identity: Option<&Identity>, required: Role) -> AuthzDecision {
    match identity {
        None => AuthzDecision::RedirectLogin,
        Some(id) if id.role == required => AuthzDecision::Pass,
        Some(_) => AuthzDecision::Denied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: 1,
            username: "test".to_string(),
            role,
        }
    }

    #[test]
    fn unauthenticated_redirects_to_login() {
        for required in Role::ALL {
            assert_eq!(authorize(None, required), AuthzDecision::RedirectLogin);
        }
    }

    #[test]
    fn matching_role_passes() {
        for required in Role::ALL {
            let id = identity(required);
            assert_eq!(authorize(Some(&id), required), AuthzDecision::Pass);
        }
    }

    #[test]
    fn mismatched_role_is_denied() {
        // No hierarchy: every cross-role combination is denied.
        for held in Role::ALL {
            for required in Role::ALL {
                if held == required {
                    continue;
                }
                let id = identity(held);
                assert_eq!(authorize(Some(&id), required), AuthzDecision::Denied);
            }
        }
    }

    #[test]
    fn parse_round_trips_all_roles() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("admin"), None);
    }
}
