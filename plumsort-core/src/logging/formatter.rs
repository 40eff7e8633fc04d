//! Log formatting options for different output styles

use crate::logging::destinations::LogEntry;

/// How logs should be formatted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// `{"timestamp":"...","level":"INFO","target":"...","message":"..."}`
    Json,
    /// `2026-01-15 10:30:00.000 INFO  [plumsort::guard] message key=value`
    Human,
    /// `timestamp=... level=INFO target=... message="..."`
    Logfmt,
}

impl LogFormat {
    /// Parse a format name ("json", "human", "logfmt")
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "human" | "text" => Some(LogFormat::Human),
            "logfmt" => Some(LogFormat::Logfmt),
            _ => None,
        }
    }

    /// Format a log entry according to this format
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Json => format_json(entry),
            LogFormat::Human => format_human(entry),
            LogFormat::Logfmt => format_logfmt(entry),
        }
    }
}

fn format_json(entry: &LogEntry) -> String {
    let mut json = serde_json::Map::new();
    json.insert("timestamp".into(), entry.timestamp.to_rfc3339().into());
    json.insert("level".into(), entry.level.as_str().into());
    json.insert("target".into(), entry.target.clone().into());
    json.insert("message".into(), entry.message.clone().into());

    for (key, value) in &entry.fields {
        json.insert(key.clone(), value.clone());
    }

    serde_json::Value::Object(json).to_string()
}

fn plain_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_human(entry: &LogEntry) -> String {
    let mut line = format!(
        "{} {:5} [{}] {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
        entry.level.as_str(),
        entry.target,
        entry.message
    );

    for (key, value) in &entry.fields {
        line.push_str(&format!(" {}={}", key, plain_value(value)));
    }

    line
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

fn format_logfmt(entry: &LogEntry) -> String {
    let mut parts = vec![
        format!("timestamp={}", entry.timestamp.to_rfc3339()),
        format!("level={}", entry.level.as_str()),
        format!("target={}", entry.target),
        format!("message={}", quote(&entry.message)),
    ];

    for (key, value) in &entry.fields {
        let rendered = match value {
            serde_json::Value::Number(_) | serde_json::Value::Bool(_) => value.to_string(),
            other => quote(&plain_value(other)),
        };
        parts.push(format!("{}={}", key, rendered));
    }

    parts.join(" ")
}
