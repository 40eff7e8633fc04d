//! Session storage trait and types

use crate::rbac::User;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A signed-in session, keyed by its opaque token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token, persisted client side to restore the session
    pub id: String,

    pub user: User,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    /// Last successful restore or login
    pub last_accessed_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with a fresh token
    pub fn issue(user: User, max_age: Duration) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), user, expiry_after(max_age))
    }

    /// Create a session with the given token and expiration
    pub fn new(id: String, user: User, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self { id, user, created_at: now, expires_at, last_accessed_at: now }
    }

    /// Check if the session is expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Update last accessed time
    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
    }
}

/// `now + lifetime`, saturating at the latest representable instant
pub fn expiry_after(lifetime: Duration) -> DateTime<Utc> {
    Utc::now().checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Session storage trait
///
/// Implement this trait to provide custom session storage backends.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Get a session by token
    async fn get(&self, id: &str) -> Result<Option<Session>>;

    /// Store or replace a session
    async fn set(&self, session: Session) -> Result<()>;

    /// Delete a session by token; deleting a missing token is not an error
    async fn delete(&self, id: &str) -> Result<()>;

    /// Check if a session exists
    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Remove expired sessions, returning how many were deleted
    async fn cleanup_expired(&self) -> Result<usize>;

    /// Get the total number of sessions
    async fn count(&self) -> Result<usize>;
}

#[async_trait::async_trait]
impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    async fn get(&self, id: &str) -> Result<Option<Session>> {
        (**self).get(id).await
    }

    async fn set(&self, session: Session) -> Result<()> {
        (**self).set(session).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        (**self).exists(id).await
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        (**self).cleanup_expired().await
    }

    async fn count(&self) -> Result<usize> {
        (**self).count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farmer() -> User {
        User::new("u1", "grower@example.com", "Grower", "farmer")
    }

    #[test]
    fn test_session_creation() {
        let session = Session::issue(farmer(), Duration::hours(1));

        assert_eq!(session.user.role, "farmer");
        assert!(!session.id.is_empty());
        assert!(!session.is_expired());
    }

    #[test]
    fn issued_tokens_are_unique() {
        let a = Session::issue(farmer(), Duration::hours(1));
        let b = Session::issue(farmer(), Duration::hours(1));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_session_expiration() {
        let session =
            Session::new("t".to_string(), farmer(), Utc::now() - Duration::seconds(1));
        assert!(session.is_expired());
    }

    #[test]
    fn huge_lifetime_saturates_instead_of_panicking() {
        let session = Session::issue(farmer(), Duration::MAX);
        assert_eq!(session.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_touch() {
        let mut session = Session::issue(farmer(), Duration::hours(1));
        let initial_access = session.last_accessed_at;
        std::thread::sleep(std::time::Duration::from_millis(10));

        session.touch();
        assert!(session.last_accessed_at > initial_access);
    }
}
