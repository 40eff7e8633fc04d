//! Configuration system for PlumSort
//!
//! # Configuration Hierarchy
//!
//! Configuration values are resolved in the following order (highest priority wins):
//!
//! 1. **Environment Variables** (`PLUMSORT_*`)
//! 2. **Config File** (plumsort.toml)
//! 3. **Defaults**
//!
//! Every section is `#[serde(default)]`, so a file only needs the keys it
//! changes.
//!
//! # Example
//!
//! ```no_run
//! use plumsort_core::config::PlumsortConfig;
//!
//! let config = PlumsortConfig::load()?;
//! config.validate()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod logging;
pub mod rbac;
pub mod sessions;

pub use logging::LoggingConfig;
pub use rbac::RbacConfig;
pub use sessions::{SessionStoreKind, SessionsConfig};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name
pub const DEFAULT_CONFIG_FILE: &str = "plumsort.toml";

/// Complete PlumSort configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlumsortConfig {
    pub sessions: SessionsConfig,
    pub rbac: RbacConfig,
    pub logging: LoggingConfig,
}

impl PlumsortConfig {
    /// Load `plumsort.toml` from the working directory, then the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific file (if it exists), then apply environment variables
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_vars();

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.sessions.apply_env_vars();
        self.rbac.apply_env_vars();
        self.logging.apply_env_vars();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.sessions.validate().context("[sessions]")?;
        self.rbac.validate().context("[rbac]")?;
        self.logging.validate().context("[logging]")?;
        Ok(())
    }
}
