//! Logging configuration

use crate::logging::{self, FileOutput, LogFormat, LogLevel, LogOutput};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// error, warn, info, debug or trace
    /// Env: PLUMSORT_LOG_LEVEL
    pub level: String,
    /// human, json or logfmt
    /// Env: PLUMSORT_LOG_FORMAT
    pub format: String,
    pub file_enabled: bool,
    /// Env: PLUMSORT_LOG_FILE
    pub file_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "human".to_string(),
            file_enabled: false,
            file_path: "./logs/plumsort.log".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("PLUMSORT_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("PLUMSORT_LOG_FORMAT") {
            self.format = format;
        }
        if let Ok(path) = env::var("PLUMSORT_LOG_FILE") {
            self.file_enabled = true;
            self.file_path = path;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.to_logging_config().map(|_| ())
    }

    /// Build the runtime logger configuration
    pub fn to_logging_config(&self) -> Result<logging::LoggingConfig> {
        let level = LogLevel::parse(&self.level)
            .ok_or_else(|| anyhow!("Invalid log level: {}", self.level))?;
        let format = LogFormat::parse(&self.format)
            .ok_or_else(|| anyhow!("Invalid log format: {}", self.format))?;

        let mut config = logging::LoggingConfig::default().with_level(level).with_format(format);
        if self.file_enabled {
            config = config.with_output(LogOutput::File(FileOutput::new(&self.file_path)));
        }
        Ok(config)
    }
}
