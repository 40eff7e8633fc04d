//! Session manager with automatic cleanup
//!
//! Wraps a `SessionStore` and periodically removes expired sessions on a
//! tokio interval. The task is aborted when the manager is dropped.

use super::SessionStore;
use crate::config::SessionsConfig;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Session manager configuration
#[derive(Debug, Clone)]
pub struct SessionManagerConfig {
    /// Enable automatic cleanup of expired sessions
    pub auto_cleanup: bool,

    /// Interval between cleanup runs
    pub cleanup_interval: Duration,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self { auto_cleanup: true, cleanup_interval: Duration::from_secs(300) }
    }
}

impl SessionManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sessions_config(config: &SessionsConfig) -> Self {
        Self::new().with_cleanup_interval(Duration::from_secs(config.cleanup_interval))
    }

    pub fn with_auto_cleanup(mut self, enabled: bool) -> Self {
        self.auto_cleanup = enabled;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }
}

/// Owns a session store and its cleanup task
///
/// Must be created inside a tokio runtime when `auto_cleanup` is on.
pub struct SessionManager<S: SessionStore> {
    store: Arc<S>,
    cleanup_task: Option<tokio::task::JoinHandle<()>>,
    config: SessionManagerConfig,
}

impl<S: SessionStore + 'static> SessionManager<S> {
    /// Create a new session manager with default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, SessionManagerConfig::default())
    }

    pub fn with_config(store: S, config: SessionManagerConfig) -> Self {
        let store = Arc::new(store);

        let cleanup_task = if config.auto_cleanup {
            let cleanup_store = Arc::clone(&store);
            let interval = config.cleanup_interval;

            Some(tokio::spawn(async move {
                let mut timer = tokio::time::interval(interval);
                loop {
                    timer.tick().await;
                    match cleanup_store.cleanup_expired().await {
                        Ok(0) => {}
                        Ok(count) => log::info!("Auto-cleaned {} expired sessions", count),
                        Err(e) => log::error!("Session cleanup failed: {}", e),
                    }
                }
            }))
        } else {
            None
        };

        Self { store, cleanup_task, config }
    }

    /// Shared handle to the underlying store
    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &SessionManagerConfig {
        &self.config
    }

    /// Run a cleanup pass now, in addition to the scheduled ones
    pub async fn cleanup_now(&self) -> Result<usize> {
        self.store.cleanup_expired().await
    }

    pub async fn session_count(&self) -> Result<usize> {
        self.store.count().await
    }
}

impl<S: SessionStore> Drop for SessionManager<S> {
    fn drop(&mut self) {
        if let Some(task) = self.cleanup_task.take() {
            task.abort();
        }
    }
}
