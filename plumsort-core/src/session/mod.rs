//! Session management for the PlumSort dashboards
//!
//! - `SessionProvider` holds the one current session and exposes
//!   login/logout/register/password reset
//! - `SessionStore` persists sessions by token (memory or JSON file)
//! - `IdentityProvider` owns accounts and credential checks
//! - `SessionView` is the read-only face the route guard depends on
//!
//! # Example
//!
//! ```no_run
//! use plumsort_core::session::{InMemoryIdentityProvider, MemorySessionStore, SessionProvider};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = SessionProvider::new(
//!     Arc::new(MemorySessionStore::new()),
//!     Arc::new(InMemoryIdentityProvider::new()),
//! );
//! provider.restore(None).await;
//! # Ok(())
//! # }
//! ```

mod file_store;
mod identity;
mod manager;
mod memory;
mod password;
mod provider;
mod state;
mod store;

pub use file_store::FileSessionStore;
pub use identity::{IdentityProvider, InMemoryIdentityProvider, NewAccount, ResetToken};
pub use manager::{SessionManager, SessionManagerConfig};
pub use memory::MemorySessionStore;
pub use password::PasswordHasherService;
pub use provider::{ListenerId, SessionProvider};
pub use state::{AuthEvent, SessionState, SessionView};
pub use store::{Session, SessionStore};

use crate::config::{SessionStoreKind, SessionsConfig};
use anyhow::Result;
use std::sync::Arc;

/// Build the session store selected by `[sessions] store`
pub fn open_store(config: &SessionsConfig) -> Result<Arc<dyn SessionStore>> {
    match config.store {
        SessionStoreKind::Memory => Ok(Arc::new(MemorySessionStore::new())),
        SessionStoreKind::File => Ok(Arc::new(FileSessionStore::open(&config.store_path)?)),
    }
}
