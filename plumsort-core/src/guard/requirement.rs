//! Per-route access requirements

use crate::rbac::{Permission, Role};
use std::collections::BTreeSet;
use std::fmt;

/// What a route demands of the signed-in user
///
/// Every variant requires a signed-in user; public pages are declared as
/// public routes and never reach the guard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessRequirement {
    /// Any signed-in user
    #[default]
    NoneRequired,
    /// The user's role must be one of these
    RequireRole(BTreeSet<Role>),
    /// The user's role must grant this permission
    RequirePermission(Permission),
}

impl AccessRequirement {
    pub fn role(role: Role) -> Self {
        AccessRequirement::RequireRole(BTreeSet::from([role]))
    }

    pub fn any_role(roles: impl IntoIterator<Item = Role>) -> Self {
        AccessRequirement::RequireRole(roles.into_iter().collect())
    }

    pub fn permission(permission: Permission) -> Self {
        AccessRequirement::RequirePermission(permission)
    }
}

impl From<Permission> for AccessRequirement {
    fn from(permission: Permission) -> Self {
        AccessRequirement::RequirePermission(permission)
    }
}

impl From<Role> for AccessRequirement {
    fn from(role: Role) -> Self {
        AccessRequirement::role(role)
    }
}

impl fmt::Display for AccessRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessRequirement::NoneRequired => write!(f, "signed in"),
            AccessRequirement::RequireRole(roles) => {
                let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
                write!(f, "role {}", names.join("|"))
            }
            AccessRequirement::RequirePermission(p) => write!(f, "permission {}", p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_stable() {
        assert_eq!(AccessRequirement::NoneRequired.to_string(), "signed in");
        assert_eq!(
            AccessRequirement::any_role([Role::Technician, Role::Admin]).to_string(),
            "role technician|admin"
        );
        assert_eq!(
            AccessRequirement::from(Permission::ManageUsers).to_string(),
            "permission manage_users"
        );
    }
}
