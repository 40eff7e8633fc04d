//! The session provider: one authoritative record of who is signed in
//!
//! Components that need the current user get an `Arc<SessionProvider>`
//! handed to them (or a `SessionView` when they only read). There is no
//! global session.

use super::identity::{IdentityProvider, NewAccount, ResetToken};
use super::state::{AuthEvent, SessionState, SessionView};
use super::store::{Session, SessionStore};
use crate::config::SessionsConfig;
use crate::error::AuthResult;
use crate::rbac::User;
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Handle returned by `on_auth_change`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type AuthListener = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

#[derive(Default)]
struct Current {
    state: SessionState,
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

/// Owns the current session and the sign-in/sign-out primitives
pub struct SessionProvider {
    store: Arc<dyn SessionStore>,
    identity: Arc<dyn IdentityProvider>,
    max_age: Duration,
    current: RwLock<Current>,
    listeners: Mutex<Vec<(ListenerId, AuthListener)>>,
    next_listener: AtomicU64,
}

impl SessionProvider {
    /// Create a provider in the `Unresolved` state
    pub fn new(store: Arc<dyn SessionStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            store,
            identity,
            max_age: Duration::hours(8),
            current: RwLock::new(Current::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    pub fn from_config(
        store: Arc<dyn SessionStore>,
        identity: Arc<dyn IdentityProvider>,
        config: &SessionsConfig,
    ) -> Self {
        Self::new(store, identity).with_max_age(config.session_lifetime())
    }

    /// Lifetime of sessions created by `login`
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Current state; a session past its expiry reads as `Unauthenticated`
    pub fn state(&self) -> SessionState {
        let current = self.current.read().unwrap_or_else(|e| e.into_inner());
        match (&current.state, current.expires_at) {
            (SessionState::Authenticated(_), Some(expires_at)) if Utc::now() >= expires_at => {
                SessionState::Unauthenticated
            }
            (state, _) => state.clone(),
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    /// Token of the current session, for the client to persist
    pub fn token(&self) -> Option<String> {
        if self.current_user().is_none() {
            return None;
        }
        self.current.read().unwrap_or_else(|e| e.into_inner()).token.clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.current.read().unwrap_or_else(|e| e.into_inner()).state.is_resolved()
    }

    /// Resolve the session from a persisted token
    ///
    /// Missing, unknown, and expired tokens resolve to `Unauthenticated`, as
    /// does a store failure. Expired records are removed from the store.
    pub async fn restore(&self, token: Option<&str>) -> SessionState {
        let resolved = match token.map(str::trim).filter(|t| !t.is_empty()) {
            None => None,
            Some(token) => self.validate_token(token).await,
        };

        let state = match resolved {
            Some(session) => {
                log::info!("Session restored for user {}", session.user.id);
                let state = SessionState::Authenticated(session.user.clone());
                self.replace(state.clone(), Some(session.id), Some(session.expires_at));
                state
            }
            None => {
                self.replace(SessionState::Unauthenticated, None, None);
                SessionState::Unauthenticated
            }
        };

        self.emit(&AuthEvent::Restored(state.clone()));
        state
    }

    /// Re-check the current token against the store
    pub async fn revalidate(&self) -> SessionState {
        let token = self.current.read().unwrap_or_else(|e| e.into_inner()).token.clone();
        self.restore(token.as_deref()).await
    }

    async fn validate_token(&self, token: &str) -> Option<Session> {
        let mut session = match self.store.get(token).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                log::debug!("Persisted session token not found");
                return None;
            }
            Err(e) => {
                log::error!("Session store lookup failed during restore: {}", e);
                return None;
            }
        };

        if session.is_expired() {
            log::debug!("Persisted session for user {} has expired", session.user.id);
            if let Err(e) = self.store.delete(token).await {
                log::warn!("Failed to remove expired session: {}", e);
            }
            return None;
        }

        session.touch();
        if let Err(e) = self.store.set(session.clone()).await {
            log::warn!("Failed to record session access: {}", e);
        }
        Some(session)
    }

    /// Sign in and make the new session current
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        let user = match self.identity.authenticate(email, password).await {
            Ok(user) => user,
            Err(e) => {
                log::info!("Sign-in rejected by {}: {}", self.identity.name(), e);
                return Err(e);
            }
        };

        let session = Session::issue(user.clone(), self.max_age);
        self.store.set(session.clone()).await?;

        let previous = self.replace(
            SessionState::Authenticated(user.clone()),
            Some(session.id.clone()),
            Some(session.expires_at),
        );
        if let Some(old_token) = previous.filter(|t| *t != session.id) {
            if let Err(e) = self.store.delete(&old_token).await {
                log::warn!("Failed to remove replaced session: {}", e);
            }
        }

        log::info!("User {} signed in as {}", user.id, user.role);
        self.emit(&AuthEvent::SignedIn(user));
        Ok(session)
    }

    /// Sign out; local state is cleared even if the store delete fails
    pub async fn logout(&self) -> AuthResult<()> {
        let user_id = self.current_user().map(|u| u.id);
        let token = self.replace(SessionState::Unauthenticated, None, None);

        self.emit(&AuthEvent::SignedOut { user_id });

        if let Some(token) = token {
            self.store.delete(&token).await?;
        }
        Ok(())
    }

    /// Create an account; does not sign it in
    pub async fn register(&self, account: NewAccount) -> AuthResult<User> {
        self.identity.register(account).await
    }

    pub async fn request_password_reset(&self, email: &str) -> AuthResult<Option<ResetToken>> {
        self.identity.request_password_reset(email).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> AuthResult<()> {
        self.identity.reset_password(token, new_password).await
    }

    /// Subscribe to sign-in, sign-out and restore events
    pub fn on_auth_change<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().unwrap_or_else(|e| e.into_inner()).push((id, Arc::new(callback)));
        id
    }

    /// Unsubscribe; `false` if the listener was already gone
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Swap the current record, returning the previous token
    fn replace(
        &self,
        state: SessionState,
        token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Option<String> {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        current.state = state;
        current.expires_at = expires_at;
        std::mem::replace(&mut current.token, token)
    }

    fn emit(&self, event: &AuthEvent) {
        // Listeners run outside the lock so they may call back into the provider.
        let listeners: Vec<AuthListener> = self
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }
}

impl SessionView for SessionProvider {
    fn session_state(&self) -> SessionState {
        self.state()
    }
}
