pub mod check;
pub mod config;
pub mod menu;
pub mod permissions;
pub mod routes;

use plumsort_core::config::PlumsortConfig;
use std::path::Path;

/// Load and validate the configuration
///
/// An explicit `--config` file must exist; otherwise `./plumsort.toml` is
/// used when present. Environment variables apply either way.
pub fn load_config(path: Option<&Path>) -> Result<PlumsortConfig, String> {
    let config = match path {
        Some(path) => {
            let mut config = PlumsortConfig::from_file(path).map_err(|e| format!("{:#}", e))?;
            config.apply_env_vars();
            config
        }
        None => PlumsortConfig::load().map_err(|e| format!("{:#}", e))?,
    };

    config.validate().map_err(|e| format!("invalid configuration: {:#}", e))?;
    Ok(config)
}

/// Map an io error from writing command output
pub(crate) fn write_err(e: std::io::Error) -> String {
    format!("failed to write output: {}", e)
}
