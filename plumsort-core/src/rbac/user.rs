//! Authenticated user record

use super::roles::Role;
use serde::{Deserialize, Serialize};

/// The identity the session provider hands to the access layer
///
/// `role` stays a raw string: records come from the backend and from
/// persisted storage, and an unrecognized value must degrade to "no
/// permissions" rather than fail deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role: role.into(),
            avatar: None,
        }
    }

    /// Attach an avatar reference
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// The role, if it is exactly one of the closed set's identifiers
    pub fn known_role(&self) -> Option<Role> {
        Role::from_identifier(&self.role)
    }

    /// Whether the record identifies anyone at all
    ///
    /// A record with a blank id is treated as no user.
    pub fn is_identified(&self) -> bool {
        !self.id.trim().is_empty()
    }
}
