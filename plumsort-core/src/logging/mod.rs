//! PlumSort logging
//!
//! A small `log::Log` implementation configured declaratively from the
//! `[logging]` config section. Code everywhere else uses the standard `log`
//! macros (`log::info!`, `log::debug!`, ...).
//!
//! # Example
//!
//! ```rust,no_run
//! use plumsort_core::logging::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::production()).unwrap();
//! log::info!("Access layer ready");
//! ```

pub mod config;
pub mod destinations;
pub mod formatter;

pub use config::{LogLevel, LoggingConfig};
pub use destinations::{FileOutput, LogEntry, LogOutput};
pub use formatter::LogFormat;

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

static INSTALLED: Mutex<bool> = Mutex::new(false);

/// Install the PlumSort logger as the global `log` backend
///
/// Once a logger is installed, later calls are no-ops. A call that fails
/// (a file output cannot be opened) installs nothing, so the next call
/// tries again.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let mut installed = INSTALLED.lock().unwrap_or_else(|e| e.into_inner());
    if *installed {
        return Ok(());
    }

    let logger = PlumsortLogger::new(config.clone())?;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(config.level.into());
    *installed = true;
    Ok(())
}

/// Logger fanning each record out to the configured sinks
struct PlumsortLogger {
    config: LoggingConfig,
    sinks: Vec<Sink>,
}

enum Sink {
    Stdout(LogFormat),
    Stderr(LogFormat),
    File { format: LogFormat, writer: Mutex<BufWriter<File>> },
}

impl PlumsortLogger {
    fn new(config: LoggingConfig) -> anyhow::Result<Self> {
        let mut sinks = Vec::new();

        for output in &config.outputs {
            let sink = match output {
                LogOutput::Stdout { format } => Sink::Stdout(format.unwrap_or(config.format)),
                LogOutput::Stderr { format } => Sink::Stderr(format.unwrap_or(config.format)),
                LogOutput::File(file) => Sink::File {
                    format: file.format.unwrap_or(config.format),
                    writer: Mutex::new(BufWriter::new(open_log_file(&file.path)?)),
                },
            };
            sinks.push(sink);
        }

        if sinks.is_empty() {
            sinks.push(Sink::Stdout(config.format));
        }

        Ok(Self { config, sinks })
    }
}

fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

impl Sink {
    fn write(&self, entry: &LogEntry) -> io::Result<()> {
        match self {
            Sink::Stdout(format) => writeln!(io::stdout().lock(), "{}", format.format_entry(entry)),
            Sink::Stderr(format) => writeln!(io::stderr().lock(), "{}", format.format_entry(entry)),
            Sink::File { format, writer } => {
                let mut writer = writer.lock().unwrap_or_else(|e| e.into_inner());
                writeln!(writer, "{}", format.format_entry(entry))
            }
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            Sink::Stdout(_) => io::stdout().flush(),
            Sink::Stderr(_) => io::stderr().flush(),
            Sink::File { writer, .. } => writer.lock().unwrap_or_else(|e| e.into_inner()).flush(),
        }
    }
}

impl log::Log for PlumsortLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LogLevel::from(metadata.level()) <= self.config.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry::from_log_record(record, &self.config);
        for sink in &self.sinks {
            let _ = sink.write(&entry);
        }
    }

    fn flush(&self) {
        for sink in &self.sinks {
            let _ = sink.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn file_sink_receives_enabled_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/plumsort.log");
        let config = LoggingConfig::default()
            .with_level(LogLevel::Info)
            .with_format(LogFormat::Json)
            .with_output(LogOutput::File(FileOutput::new(path.to_string_lossy())));

        let logger = PlumsortLogger::new(config).unwrap();
        logger.log(
            &log::Record::builder()
                .level(log::Level::Info)
                .target("plumsort::guard")
                .args(format_args!("redirecting"))
                .build(),
        );
        logger.log(
            &log::Record::builder()
                .level(log::Level::Debug)
                .target("plumsort::guard")
                .args(format_args!("too chatty"))
                .build(),
        );
        logger.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed["message"], "redirecting");
        assert_eq!(parsed["service"], "plumsort");
    }

    #[test]
    fn failed_init_can_be_retried() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let config = LoggingConfig::default().with_output(LogOutput::File(FileOutput::new(
            blocker.join("plumsort.log").to_string_lossy(),
        )));

        assert!(init_logging(&config).is_err());
        assert!(init_logging(&config).is_err());
        assert!(!*INSTALLED.lock().unwrap());
    }

    #[test]
    fn no_outputs_defaults_to_stdout() {
        let logger = PlumsortLogger::new(LoggingConfig::default()).unwrap();
        assert_eq!(logger.sinks.len(), 1);
        assert!(matches!(logger.sinks[0], Sink::Stdout(LogFormat::Human)));
    }
}
