//! Static role -> permission table
//!
//! The table is built once and never mutated. Every role in the closed set
//! has an entry (possibly empty); lookups for anything else degrade to an
//! empty set, an empty menu, or `false`.

use super::menu::{derive_menu, MenuDescriptor, MENU_CATALOG};
use super::permissions::Permission;
use super::roles::Role;
use super::user::User;
use super::PermissionChecker;
use crate::config::RbacConfig;
use crate::error::RbacError;
use std::collections::{HashMap, HashSet};

/// Grants every permission when used in a role override
pub const WILDCARD: &str = "*";

lazy_static::lazy_static! {
    static ref STANDARD_TABLE: PermissionTable = PermissionTable::standard();
}

/// Process-wide standard table
pub fn standard_table() -> &'static PermissionTable {
    &STANDARD_TABLE
}

/// Role -> permissions and role -> menu lookup
#[derive(Debug, Clone)]
pub struct PermissionTable {
    permissions: HashMap<Role, HashSet<Permission>>,
    menus: HashMap<Role, Vec<MenuDescriptor>>,
    no_permissions: HashSet<Permission>,
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PermissionTable {
    /// The grants the dashboards ship with
    pub fn standard() -> Self {
        Self::from_grants(standard_grants())
    }

    /// Build a table from explicit grants
    ///
    /// Roles missing from `grants` get an empty entry.
    pub fn from_grants(mut grants: HashMap<Role, HashSet<Permission>>) -> Self {
        for role in Role::ALL {
            grants.entry(role).or_default();
        }

        let menus = grants
            .iter()
            .map(|(role, perms)| (*role, derive_menu(*role, perms, MENU_CATALOG)))
            .collect();

        Self { permissions: grants, menus, no_permissions: HashSet::new() }
    }

    /// Standard grants with the per-role overrides from configuration applied
    ///
    /// An override replaces the role's whole set. Role names and permission
    /// identifiers must belong to the closed sets.
    pub fn from_config(config: &RbacConfig) -> Result<Self, RbacError> {
        let mut grants = standard_grants();

        for (role_name, identifiers) in &config.roles {
            let role: Role = role_name.parse()?;
            let mut set = HashSet::new();
            for identifier in identifiers {
                if identifier.trim() == WILDCARD {
                    set.extend(Permission::ALL);
                } else {
                    set.insert(identifier.parse::<Permission>()?);
                }
            }
            log::debug!("RBAC override: role '{}' granted {} permissions", role, set.len());
            grants.insert(role, set);
        }

        Ok(Self::from_grants(grants))
    }

    /// Permissions granted to `role`; empty for unknown roles
    pub fn permissions_for(&self, role: &str) -> &HashSet<Permission> {
        Role::from_identifier(role)
            .and_then(|r| self.permissions.get(&r))
            .unwrap_or(&self.no_permissions)
    }

    /// Ordered menu for `role`; empty for unknown roles
    pub fn menu_items_for(&self, role: &str) -> &[MenuDescriptor] {
        Role::from_identifier(role)
            .and_then(|r| self.menus.get(&r))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `user` holds `permission`
    ///
    /// `false` for no user, a blank user record, or a role outside the table.
    pub fn has_permission(&self, user: Option<&User>, permission: Permission) -> bool {
        match user {
            Some(user) if user.is_identified() => {
                self.permissions_for(&user.role).contains(&permission)
            }
            _ => false,
        }
    }

    /// String-keyed variant for callers holding a raw permission name
    pub fn has_permission_named(&self, user: Option<&User>, name: &str) -> bool {
        match Permission::parse(name) {
            Some(permission) => self.has_permission(user, permission),
            None => {
                log::debug!("Permission check for unknown permission '{}' denied", name);
                false
            }
        }
    }
}

impl PermissionChecker for PermissionTable {
    fn has_permission(&self, role: &str, permission: Permission) -> bool {
        self.permissions_for(role).contains(&permission)
    }
}

fn standard_grants() -> HashMap<Role, HashSet<Permission>> {
    use Permission::*;

    let farmer = HashSet::from([
        ViewDashboard,
        ViewFarms,
        CreateFarm,
        EditFarm,
        DeleteFarm,
        ViewBatches,
        CreateBatch,
        EditBatch,
        ClassifyImages,
        ViewResults,
        ViewReports,
        ViewNotifications,
        ManageSettings,
    ]);

    let technician = HashSet::from([
        ViewDashboard,
        ViewFarms,
        ViewBatches,
        EditBatch,
        ClassifyImages,
        ViewResults,
        ViewReports,
        ExportReports,
        ViewNotifications,
        ManageSettings,
    ]);

    let admin: HashSet<Permission> = Permission::ALL.into_iter().collect();

    HashMap::from([(Role::Farmer, farmer), (Role::Technician, technician), (Role::Admin, admin)])
}
