//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use plumsort_core::prelude::*;
//! ```
//!
//! Re-exports the types a dashboard shell touches on every navigation.

// === Wiring ===
pub use crate::app::{PlumsortApp, PlumsortAppBuilder};

// === Configuration ===
pub use crate::config::PlumsortConfig;
pub use crate::logging::{init_logging, LoggingConfig};

// === RBAC ===
pub use crate::rbac::{
    role_home, standard_table, MenuDescriptor, Permission, PermissionChecker, PermissionTable,
    Role, User,
};

// === Sessions ===
pub use crate::session::{
    AuthEvent, IdentityProvider, InMemoryIdentityProvider, MemorySessionStore, NewAccount,
    SessionProvider, SessionState, SessionStore, SessionView,
};

// === Guard ===
pub use crate::guard::{
    AccessDecision, AccessGuard, AccessRequirement, GuardOutcome, NavigationOutcome, Navigator,
    Redirect, RouteTable,
};

// === Errors ===
pub use crate::error::{AuthError, AuthResult};
