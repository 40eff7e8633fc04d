//! Permission set for the PlumSort dashboards
//!
//! Permissions are a closed enum. The snake_case identifier is what config
//! files and the backend use; anything that does not parse is rejected at
//! load time instead of silently denying at check time.

use crate::error::RbacError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An action a role may be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewDashboard,
    ViewFarms,
    CreateFarm,
    EditFarm,
    DeleteFarm,
    ViewBatches,
    CreateBatch,
    EditBatch,
    DeleteBatch,
    /// Submit plum images to the classification API
    ClassifyImages,
    /// Read classification scores for a batch
    ViewResults,
    ViewReports,
    ExportReports,
    ViewNotifications,
    ManageSettings,
    InviteUsers,
    ManageUsers,
    ViewSystemLogs,
}

impl Permission {
    /// Every permission, in declaration order
    pub const ALL: [Permission; 18] = [
        Permission::ViewDashboard,
        Permission::ViewFarms,
        Permission::CreateFarm,
        Permission::EditFarm,
        Permission::DeleteFarm,
        Permission::ViewBatches,
        Permission::CreateBatch,
        Permission::EditBatch,
        Permission::DeleteBatch,
        Permission::ClassifyImages,
        Permission::ViewResults,
        Permission::ViewReports,
        Permission::ExportReports,
        Permission::ViewNotifications,
        Permission::ManageSettings,
        Permission::InviteUsers,
        Permission::ManageUsers,
        Permission::ViewSystemLogs,
    ];

    /// Stable identifier, e.g. `"manage_users"`
    pub fn identifier(&self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view_dashboard",
            Permission::ViewFarms => "view_farms",
            Permission::CreateFarm => "create_farm",
            Permission::EditFarm => "edit_farm",
            Permission::DeleteFarm => "delete_farm",
            Permission::ViewBatches => "view_batches",
            Permission::CreateBatch => "create_batch",
            Permission::EditBatch => "edit_batch",
            Permission::DeleteBatch => "delete_batch",
            Permission::ClassifyImages => "classify_images",
            Permission::ViewResults => "view_results",
            Permission::ViewReports => "view_reports",
            Permission::ExportReports => "export_reports",
            Permission::ViewNotifications => "view_notifications",
            Permission::ManageSettings => "manage_settings",
            Permission::InviteUsers => "invite_users",
            Permission::ManageUsers => "manage_users",
            Permission::ViewSystemLogs => "view_system_logs",
        }
    }

    /// Parse an identifier. Surrounding whitespace is ignored, case is not.
    pub fn parse(identifier: &str) -> Option<Permission> {
        let identifier = identifier.trim();
        Permission::ALL.iter().copied().find(|p| p.identifier() == identifier)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Permission {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::parse(s).ok_or_else(|| RbacError::UnknownPermission(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identifiers_are_unique() {
        let ids: HashSet<&str> = Permission::ALL.iter().map(|p| p.identifier()).collect();
        assert_eq!(ids.len(), Permission::ALL.len());
    }

    #[test]
    fn parse_accepts_known_identifiers() {
        assert_eq!(Permission::parse("manage_users"), Some(Permission::ManageUsers));
        assert_eq!(Permission::parse("  view_farms "), Some(Permission::ViewFarms));
    }

    #[test]
    fn parse_rejects_typos() {
        assert_eq!(Permission::parse("manage_user"), None);
        assert_eq!(Permission::parse("MANAGE_USERS"), None);
        assert_eq!(
            "view_farm".parse::<Permission>(),
            Err(RbacError::UnknownPermission("view_farm".to_string()))
        );
    }

    #[test]
    fn serde_uses_identifier() {
        let json = serde_json::to_string(&Permission::ClassifyImages).unwrap();
        assert_eq!(json, "\"classify_images\"");
        let back: Permission = serde_json::from_str("\"export_reports\"").unwrap();
        assert_eq!(back, Permission::ExportReports);
    }
}
