//! Sessions configuration

use anyhow::{bail, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;

/// Upper bound for `max_age` and `reset_token_ttl` (ten years)
pub const MAX_LIFETIME_SECS: u64 = 10 * 365 * 24 * 60 * 60;

fn lifetime(secs: u64) -> Duration {
    let secs = i64::try_from(secs.min(MAX_LIFETIME_SECS)).unwrap_or(i64::MAX);
    Duration::try_seconds(secs).unwrap_or(Duration::MAX)
}

/// Where sessions are kept between restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreKind {
    /// Lost on restart
    Memory,
    /// JSON file at `store_path`, hydrated on startup
    File,
}

/// Sessions configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Session maximum age in seconds
    /// Env: PLUMSORT_SESSION_MAX_AGE
    /// Default: 28800 (8 hours)
    pub max_age: u64,

    /// Expired-session cleanup interval in seconds
    /// Env: PLUMSORT_SESSION_CLEANUP_INTERVAL
    /// Default: 300 (5 minutes)
    pub cleanup_interval: u64,

    /// Session store back end: "memory" or "file"
    /// Env: PLUMSORT_SESSION_STORE
    /// Default: memory
    pub store: SessionStoreKind,

    /// File used by the file store
    /// Env: PLUMSORT_SESSION_STORE_PATH
    /// Default: "./data/sessions.json"
    pub store_path: String,

    /// Lifetime of password reset tokens in seconds
    /// Env: PLUMSORT_SESSION_RESET_TOKEN_TTL
    /// Default: 3600
    pub reset_token_ttl: u64,

    /// Minimum accepted password length for register/reset
    /// Default: 8
    pub min_password_length: usize,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_age: 28800,
            cleanup_interval: 300,
            store: SessionStoreKind::Memory,
            store_path: "./data/sessions.json".to_string(),
            reset_token_ttl: 3600,
            min_password_length: 8,
        }
    }
}

impl SessionsConfig {
    pub fn apply_env_vars(&mut self) {
        if let Ok(max_age) = env::var("PLUMSORT_SESSION_MAX_AGE") {
            if let Ok(m) = max_age.parse() {
                self.max_age = m;
            }
        }

        if let Ok(interval) = env::var("PLUMSORT_SESSION_CLEANUP_INTERVAL") {
            if let Ok(i) = interval.parse() {
                self.cleanup_interval = i;
            }
        }

        if let Ok(store) = env::var("PLUMSORT_SESSION_STORE") {
            match store.to_ascii_lowercase().as_str() {
                "memory" => self.store = SessionStoreKind::Memory,
                "file" => self.store = SessionStoreKind::File,
                other => log::warn!("Ignoring PLUMSORT_SESSION_STORE={}", other),
            }
        }

        if let Ok(path) = env::var("PLUMSORT_SESSION_STORE_PATH") {
            self.store_path = path;
        }

        if let Ok(ttl) = env::var("PLUMSORT_SESSION_RESET_TOKEN_TTL") {
            if let Ok(t) = ttl.parse() {
                self.reset_token_ttl = t;
            }
        }
    }

    /// `max_age` as a duration, capped at `MAX_LIFETIME_SECS`
    pub fn session_lifetime(&self) -> Duration {
        lifetime(self.max_age)
    }

    /// `reset_token_ttl` as a duration, capped at `MAX_LIFETIME_SECS`
    pub fn reset_token_lifetime(&self) -> Duration {
        lifetime(self.reset_token_ttl)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_age == 0 || self.max_age > MAX_LIFETIME_SECS {
            bail!("Invalid max_age: must be between 1 and {} seconds", MAX_LIFETIME_SECS);
        }

        if self.cleanup_interval == 0 {
            bail!("Invalid cleanup_interval: must be greater than 0");
        }

        if self.store == SessionStoreKind::File && self.store_path.trim().is_empty() {
            bail!("Invalid store_path: required when store = \"file\"");
        }

        if self.reset_token_ttl == 0 || self.reset_token_ttl > MAX_LIFETIME_SECS {
            bail!("Invalid reset_token_ttl: must be between 1 and {} seconds", MAX_LIFETIME_SECS);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_lifetimes_fail_validation() {
        for secs in [u64::MAX, 10_000_000_000_000_000, MAX_LIFETIME_SECS + 1] {
            let config = SessionsConfig { max_age: secs, ..SessionsConfig::default() };
            assert!(config.validate().is_err(), "max_age {}", secs);

            let config = SessionsConfig { reset_token_ttl: secs, ..SessionsConfig::default() };
            assert!(config.validate().is_err(), "reset_token_ttl {}", secs);
        }

        let config = SessionsConfig { max_age: MAX_LIFETIME_SECS, ..SessionsConfig::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn lifetimes_are_capped_not_wrapped() {
        let config = SessionsConfig {
            max_age: u64::MAX,
            reset_token_ttl: 10_000_000_000_000_000,
            ..SessionsConfig::default()
        };
        let cap = Duration::seconds(MAX_LIFETIME_SECS as i64);
        assert_eq!(config.session_lifetime(), cap);
        assert_eq!(config.reset_token_lifetime(), cap);
        assert_eq!(SessionsConfig::default().session_lifetime(), Duration::hours(8));
    }
}
