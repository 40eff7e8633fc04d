//! Runtime logger configuration

use crate::logging::{LogFormat, LogOutput};
use std::collections::BTreeMap;

/// Runtime logging configuration
///
/// Built from the `[logging]` config section, or assembled in code.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Minimum log level to capture
    pub level: LogLevel,
    /// Where logs are sent; stdout when empty
    pub outputs: Vec<LogOutput>,
    /// Default format for outputs that do not override it
    pub format: LogFormat,
    /// Fields added to every entry
    pub context_fields: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            outputs: Vec::new(),
            format: LogFormat::Human,
            context_fields: BTreeMap::from([("service".to_string(), "plumsort".to_string())]),
        }
    }
}

/// Log levels in order of severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse a level name ("info", "WARN", ...)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl LoggingConfig {
    /// JSON on stdout at info level
    pub fn production() -> Self {
        Self::default().with_format(LogFormat::Json)
    }

    /// Human-readable on stderr at debug level
    pub fn development() -> Self {
        Self::default()
            .with_level(LogLevel::Debug)
            .with_output(LogOutput::Stderr { format: None })
    }

    /// Set the minimum log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the default format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Add an output
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.outputs.push(output);
        self
    }

    /// Add a context field that appears in every log entry
    pub fn with_context_field(mut self, key: &str, value: &str) -> Self {
        self.context_fields.insert(key.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::FileOutput;

    #[test]
    fn level_parsing() {
        assert_eq!(LogLevel::parse("INFO"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse(" warning "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("verbose"), None);
    }

    #[test]
    fn levels_order_by_verbosity() {
        assert!(LogLevel::Error < LogLevel::Info);
        assert!(LogLevel::Trace > LogLevel::Debug);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LoggingConfig::production()
            .with_output(LogOutput::File(FileOutput::new("./test.log")))
            .with_context_field("node", "sorter-1")
            .with_level(LogLevel::Debug);

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.outputs.len(), 1);
        assert_eq!(config.context_fields.get("service"), Some(&"plumsort".to_string()));
        assert_eq!(config.context_fields.get("node"), Some(&"sorter-1".to_string()));
    }
}
