//! Navigation menu derivation
//!
//! Menus are derived from a single catalog: a role sees every entry whose
//! required permission it holds, in catalog order. The dashboard entry
//! always points at the role's own home. Menus only drive navigation; the
//! guard re-checks every route on its own.

use super::permissions::Permission;
use super::roles::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A navigation item as rendered by the sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDescriptor {
    pub id: String,
    pub label: String,
    /// Icon key understood by the presentation layer
    pub icon: String,
    pub path: String,
}

/// Catalog entry a menu item is derived from
#[derive(Debug, Clone, Copy)]
pub struct MenuEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    /// Ignored for the dashboard entry, which uses the role's home
    pub path: &'static str,
    /// `None` means every role with a table entry sees it
    pub requires: Option<Permission>,
    pub dashboard: bool,
}

/// The application's menu catalog, in display order
pub const MENU_CATALOG: &[MenuEntry] = &[
    MenuEntry {
        id: "dashboard",
        label: "Dashboard",
        icon: "dashboard",
        path: "/dashboard",
        requires: Some(Permission::ViewDashboard),
        dashboard: true,
    },
    MenuEntry {
        id: "farms",
        label: "Farms",
        icon: "farm",
        path: "/farms",
        requires: Some(Permission::ViewFarms),
        dashboard: false,
    },
    MenuEntry {
        id: "batches",
        label: "Batches",
        icon: "batch",
        path: "/batches",
        requires: Some(Permission::ViewBatches),
        dashboard: false,
    },
    MenuEntry {
        id: "classify",
        label: "Classify",
        icon: "camera",
        path: "/classify",
        requires: Some(Permission::ClassifyImages),
        dashboard: false,
    },
    MenuEntry {
        id: "results",
        label: "Results",
        icon: "chart",
        path: "/results",
        requires: Some(Permission::ViewResults),
        dashboard: false,
    },
    MenuEntry {
        id: "reports",
        label: "Reports",
        icon: "report",
        path: "/reports",
        requires: Some(Permission::ViewReports),
        dashboard: false,
    },
    MenuEntry {
        id: "notifications",
        label: "Notifications",
        icon: "bell",
        path: "/notifications",
        requires: Some(Permission::ViewNotifications),
        dashboard: false,
    },
    MenuEntry {
        id: "users",
        label: "Users",
        icon: "users",
        path: "/users",
        requires: Some(Permission::ManageUsers),
        dashboard: false,
    },
    MenuEntry {
        id: "system-logs",
        label: "System logs",
        icon: "logs",
        path: "/system-logs",
        requires: Some(Permission::ViewSystemLogs),
        dashboard: false,
    },
    MenuEntry {
        id: "settings",
        label: "Settings",
        icon: "settings",
        path: "/settings",
        requires: Some(Permission::ManageSettings),
        dashboard: false,
    },
];

impl MenuEntry {
    fn visible_with(&self, permissions: &HashSet<Permission>) -> bool {
        self.requires.map_or(true, |p| permissions.contains(&p))
    }

    fn descriptor_for(&self, role: Role) -> MenuDescriptor {
        let path = if self.dashboard { role.home_path() } else { self.path };
        MenuDescriptor {
            id: self.id.to_string(),
            label: self.label.to_string(),
            icon: self.icon.to_string(),
            path: path.to_string(),
        }
    }
}

/// Build the ordered menu for `role` from `catalog`
pub fn derive_menu(
    role: Role,
    permissions: &HashSet<Permission>,
    catalog: &[MenuEntry],
) -> Vec<MenuDescriptor> {
    catalog
        .iter()
        .filter(|entry| entry.visible_with(permissions))
        .map(|entry| entry.descriptor_for(role))
        .collect()
}
