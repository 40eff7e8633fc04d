//! Role management for RBAC

use crate::error::RbacError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Landing page for users whose role is not recognized
pub const FALLBACK_HOME: &str = "/dashboard";

/// The closed set of user roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Technician,
    Admin,
}

impl Role {
    /// Every role, least to most privileged
    pub const ALL: [Role; 3] = [Role::Farmer, Role::Technician, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Technician => "technician",
            Role::Admin => "admin",
        }
    }

    /// Exact lowercase match, as stored on user records
    ///
    /// Access decisions go through this; anything else is an unknown role.
    pub fn from_identifier(identifier: &str) -> Option<Role> {
        Role::ALL.iter().copied().find(|r| r.as_str() == identifier)
    }

    /// Parse a role name typed by an operator, ignoring case and
    /// surrounding whitespace
    pub fn parse(name: &str) -> Option<Role> {
        let name = name.trim();
        Role::ALL.iter().copied().find(|r| r.as_str().eq_ignore_ascii_case(name))
    }

    /// Dashboard a user of this role lands on
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin-dashboard",
            Role::Technician => "/technician-dashboard",
            Role::Farmer => "/farmer-dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| RbacError::UnknownRole(s.to_string()))
    }
}

/// Home path for any role string, including unrecognized ones
pub fn role_home(role: &str) -> &'static str {
    Role::from_identifier(role).map(|r| r.home_path()).unwrap_or(FALLBACK_HOME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" technician "), Some(Role::Technician));
        assert_eq!(Role::parse("FARMER"), Some(Role::Farmer));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn role_home_is_total() {
        assert_eq!(role_home("admin"), "/admin-dashboard");
        assert_eq!(role_home("technician"), "/technician-dashboard");
        assert_eq!(role_home("farmer"), "/farmer-dashboard");
        assert_eq!(role_home("inspector"), "/dashboard");
        assert_eq!(role_home(""), "/dashboard");
        assert_eq!(role_home("\u{0}"), "/dashboard");
        assert_eq!(role_home("Admin"), "/dashboard");
    }

    #[test]
    fn identifiers_match_exactly() {
        assert_eq!(Role::from_identifier("admin"), Some(Role::Admin));
        for spelling in ["ADMIN", " Admin\t", "aDmIn\n", "admin "] {
            assert_eq!(Role::from_identifier(spelling), None, "{:?}", spelling);
        }
    }

    #[test]
    fn from_str_reports_unknown_role() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("root".parse::<Role>(), Err(RbacError::UnknownRole("root".to_string())));
    }
}
