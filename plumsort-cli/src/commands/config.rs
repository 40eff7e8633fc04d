use std::fs;
use std::io::Write;
use std::path::Path;

use plumsort_core::config::PlumsortConfig;

use super::write_err;

/// Print the effective configuration.
pub fn show(config: &PlumsortConfig, out: &mut dyn Write) -> Result<(), String> {
    let rendered = config.to_toml().map_err(|e| format!("{:#}", e))?;
    write!(out, "{}", rendered).map_err(write_err)
}

/// Write a default configuration file at `path`.
pub fn init(path: &Path, force: bool, out: &mut dyn Write) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!("\"{}\" already exists (use --force to overwrite)", path.display()));
    }

    let rendered = PlumsortConfig::default().to_toml().map_err(|e| format!("{:#}", e))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create directory {}: {}", parent.display(), e))?;
        }
    }
    fs::write(path, rendered).map_err(|e| format!("failed to write {}: {}", path.display(), e))?;

    writeln!(out, "Wrote {}", path.display()).map_err(write_err)
}
