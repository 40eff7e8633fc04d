//! RBAC configuration

use crate::rbac::PermissionTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RbacConfig {
    /// Record denied navigations in the in-memory audit log
    /// Env: PLUMSORT_RBAC_AUDIT_ENABLED
    pub audit_enabled: bool,

    /// Number of denials the audit log keeps
    /// Env: PLUMSORT_RBAC_AUDIT_CAPACITY
    pub audit_capacity: usize,

    /// Append `?redirect=<path>` to login redirects
    /// Env: PLUMSORT_RBAC_CARRY_RETURN_PATH
    pub carry_return_path: bool,

    /// Per-role permission overrides, e.g. `technician = ["*"]`
    pub roles: BTreeMap<String, Vec<String>>,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            audit_enabled: true,
            audit_capacity: 256,
            carry_return_path: true,
            roles: BTreeMap::new(),
        }
    }
}

impl RbacConfig {
    pub fn apply_env_vars(&mut self) {
        if let Ok(audit) = env::var("PLUMSORT_RBAC_AUDIT_ENABLED") {
            self.audit_enabled = audit.parse().unwrap_or(true);
        }
        if let Ok(capacity) = env::var("PLUMSORT_RBAC_AUDIT_CAPACITY") {
            if let Ok(c) = capacity.parse() {
                self.audit_capacity = c;
            }
        }
        if let Ok(carry) = env::var("PLUMSORT_RBAC_CARRY_RETURN_PATH") {
            self.carry_return_path = carry.parse().unwrap_or(true);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.audit_enabled && self.audit_capacity == 0 {
            anyhow::bail!("Invalid audit_capacity: must be greater than 0 when audit is enabled");
        }
        PermissionTable::from_config(self).context("Invalid [rbac.roles] override")?;
        Ok(())
    }
}
