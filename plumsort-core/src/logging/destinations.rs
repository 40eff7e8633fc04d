//! Log output destinations and the structured entry they receive

use crate::logging::{LogFormat, LogLevel, LoggingConfig};
use std::collections::BTreeMap;

/// Where logs should be sent
#[derive(Clone, Debug, PartialEq)]
pub enum LogOutput {
    /// Write to stdout
    Stdout {
        /// Override the default format for this output
        format: Option<LogFormat>,
    },
    /// Write to stderr
    Stderr {
        /// Override the default format for this output
        format: Option<LogFormat>,
    },
    /// Append to a file
    File(FileOutput),
}

/// Append-only file output
#[derive(Clone, Debug, PartialEq)]
pub struct FileOutput {
    pub path: String,
    pub format: Option<LogFormat>,
}

impl FileOutput {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), format: None }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// A structured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Usually the module path
    pub target: String,
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            level,
            message: message.into(),
            target: target.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Build an entry from a `log::Record`, adding the config's context fields
    pub fn from_log_record(record: &log::Record, config: &LoggingConfig) -> Self {
        let mut entry =
            Self::new(record.level().into(), record.args().to_string(), record.target());

        for (key, value) in &config.context_fields {
            entry.fields.insert(key.clone(), serde_json::Value::String(value.clone()));
        }

        entry
    }

    /// Add a structured field to the log entry
    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}
