//! Session state as seen by the access layer

use crate::rbac::User;

/// Where the session provider is in resolving the current user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Persisted credential not validated yet; nothing may redirect
    #[default]
    Unresolved,
    Authenticated(User),
    Unauthenticated,
}

impl SessionState {
    /// The signed-in user, if any
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, SessionState::Unresolved)
    }
}

/// Read-only view of the current session
///
/// The guard depends on this instead of the concrete provider so tests can
/// hand it a fixed state.
pub trait SessionView: Send + Sync {
    fn session_state(&self) -> SessionState;
}

impl SessionView for SessionState {
    fn session_state(&self) -> SessionState {
        self.clone()
    }
}

impl<V: SessionView + ?Sized> SessionView for std::sync::Arc<V> {
    fn session_state(&self) -> SessionState {
        (**self).session_state()
    }
}

/// Fired to `on_auth_change` listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(User),
    SignedOut { user_id: Option<String> },
    /// Startup restore finished with this state
    Restored(SessionState),
}
