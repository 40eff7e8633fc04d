//! PlumSort RBAC (Role-Based Access Control) Module
//!
//! Static data the access guard reads: the closed role and permission sets,
//! the role -> permission table and the per-role navigation menus.
//!
//! # Example
//! ```rust,ignore
//! use plumsort_core::rbac::{standard_table, Permission, User};
//!
//! let tech = User::new("u7", "tech@example.com", "Tech", "technician");
//! assert!(!standard_table().has_permission(Some(&tech), Permission::ManageUsers));
//! ```

mod menu;
mod permissions;
mod roles;
mod table;
mod user;

pub use menu::{derive_menu, MenuDescriptor, MenuEntry, MENU_CATALOG};
pub use permissions::Permission;
pub use roles::{role_home, Role, FALLBACK_HOME};
pub use table::{standard_table, PermissionTable, WILDCARD};
pub use user::User;

/// Trait for checking if a role has a specific permission
///
/// The guard only depends on this trait, so tests can swap in a fake table.
pub trait PermissionChecker: Send + Sync {
    /// Check if a given role has the specified permission
    ///
    /// # Arguments
    /// * `role` - The raw role name carried by the user record
    /// * `permission` - The permission being checked
    ///
    /// # Returns
    /// `true` if the role has the permission, `false` otherwise (including
    /// for roles the checker does not know)
    fn has_permission(&self, role: &str, permission: Permission) -> bool;
}

impl<C: PermissionChecker + ?Sized> PermissionChecker for std::sync::Arc<C> {
    fn has_permission(&self, role: &str, permission: Permission) -> bool {
        (**self).has_permission(role, permission)
    }
}

impl<C: PermissionChecker + ?Sized> PermissionChecker for &C {
    fn has_permission(&self, role: &str, permission: Permission) -> bool {
        (**self).has_permission(role, permission)
    }
}
