use std::io::Write;

use plumsort_core::config::PlumsortConfig;
use plumsort_core::rbac::{PermissionTable, Role};

use super::write_err;

/// Print the menu `role` would see, in display order.
pub fn run(
    config: &PlumsortConfig,
    role: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), String> {
    let role: Role = role.parse().map_err(|e| format!("{}", e))?;
    let table = PermissionTable::from_config(&config.rbac).map_err(|e| e.to_string())?;
    let items = table.menu_items_for(role.as_str());

    if json {
        let rendered = serde_json::to_string_pretty(items).map_err(|e| e.to_string())?;
        return writeln!(out, "{}", rendered).map_err(write_err);
    }

    for item in items {
        writeln!(out, "{:<16} {:<16} {}", item.id, item.label, item.path).map_err(write_err)?;
    }
    Ok(())
}
