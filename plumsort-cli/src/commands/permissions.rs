use std::collections::BTreeMap;
use std::io::Write;

use plumsort_core::config::PlumsortConfig;
use plumsort_core::rbac::{PermissionTable, Role};

use super::write_err;

/// List granted permissions for one role, or for all of them.
pub fn run(
    config: &PlumsortConfig,
    role: Option<&str>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), String> {
    let roles: Vec<Role> = match role {
        Some(name) => vec![name.parse().map_err(|e| format!("{}", e))?],
        None => Role::ALL.to_vec(),
    };
    let table = PermissionTable::from_config(&config.rbac).map_err(|e| e.to_string())?;

    let mut grants: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for role in &roles {
        let mut granted: Vec<_> = table.permissions_for(role.as_str()).iter().copied().collect();
        granted.sort();
        grants.insert(role.as_str(), granted.iter().map(|p| p.identifier()).collect());
    }

    if json {
        let rendered = serde_json::to_string_pretty(&grants).map_err(|e| e.to_string())?;
        return writeln!(out, "{}", rendered).map_err(write_err);
    }

    for role in &roles {
        let granted = &grants[role.as_str()];
        writeln!(out, "{} ({})", role, granted.len()).map_err(write_err)?;
        for identifier in granted {
            writeln!(out, "  {}", identifier).map_err(write_err)?;
        }
    }
    Ok(())
}
