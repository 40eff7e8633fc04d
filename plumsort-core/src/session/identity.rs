//! Identity providers: credential checks, registration and password reset
//!
//! The session provider delegates every credential decision here. The
//! in-memory provider is what the CLI and the test suites run against; a
//! deployment backed by the PlumSort REST API implements the same trait.

use super::password::PasswordHasherService;
use super::store::expiry_after;
use crate::config::SessionsConfig;
use crate::error::{AuthError, AuthResult};
use crate::rbac::{Role, User};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

/// Registration request
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

/// A single-use password reset token
///
/// Delivery (email, SMS) is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    pub token: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Source of truth for accounts and credentials
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Check an email/password pair and return the account's user record
    async fn authenticate(&self, email: &str, password: &str) -> AuthResult<User>;

    /// Create an account
    async fn register(&self, account: NewAccount) -> AuthResult<User>;

    /// Start a password reset
    ///
    /// Unknown emails yield `Ok(None)` so callers cannot probe for accounts.
    async fn request_password_reset(&self, email: &str) -> AuthResult<Option<ResetToken>>;

    /// Finish a password reset; the token is consumed even on failure
    async fn reset_password(&self, token: &str, new_password: &str) -> AuthResult<()>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

struct Account {
    user: User,
    password_hash: String,
    active: bool,
}

struct PendingReset {
    email: String,
    expires_at: DateTime<Utc>,
}

/// Accounts kept in memory with Argon2id password hashes
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    resets: Mutex<HashMap<String, PendingReset>>,
    hasher: PasswordHasherService,
    reset_ttl: Duration,
    min_password_length: usize,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            resets: Mutex::new(HashMap::new()),
            hasher: PasswordHasherService::new(),
            reset_ttl: Duration::hours(1),
            min_password_length: 8,
        }
    }

    pub fn from_config(config: &SessionsConfig) -> Self {
        Self::new()
            .with_reset_ttl(config.reset_token_lifetime())
            .with_min_password_length(config.min_password_length)
    }

    pub fn with_reset_ttl(mut self, ttl: Duration) -> Self {
        self.reset_ttl = ttl;
        self
    }

    pub fn with_min_password_length(mut self, length: usize) -> Self {
        self.min_password_length = length;
        self
    }

    /// Seed an account with an arbitrary user record
    ///
    /// Unlike `register`, the role is taken verbatim, which is how records
    /// with unrecognized roles reach the access layer.
    pub fn add_account(&self, user: User, password: &str) -> AuthResult<()> {
        let password_hash = self.hasher.hash_password(password)?;
        let key = normalize_email(&user.email);
        self.accounts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, Account { user, password_hash, active: true });
        Ok(())
    }

    /// Enable or disable sign-in for an account; `false` if it does not exist
    pub fn set_active(&self, email: &str, active: bool) -> bool {
        let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
        match accounts.get_mut(&normalize_email(email)) {
            Some(account) => {
                account.active = active;
                true
            }
            None => false,
        }
    }

    pub fn account_count(&self) -> usize {
        self.accounts.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn check_password_policy(&self, password: &str) -> AuthResult<()> {
        if password.chars().count() < self.min_password_length {
            return Err(AuthError::WeakPassword { min_length: self.min_password_length });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn authenticate(&self, email: &str, password: &str) -> AuthResult<User> {
        let (user, hash, active) = {
            let accounts = self.accounts.read().unwrap_or_else(|e| e.into_inner());
            match accounts.get(&normalize_email(email)) {
                Some(a) => (a.user.clone(), a.password_hash.clone(), a.active),
                None => return Err(AuthError::InvalidCredentials),
            }
        };

        if !self.hasher.verify_password(password, &hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        if !active {
            return Err(AuthError::AccountDisabled(user.email));
        }
        Ok(user)
    }

    async fn register(&self, account: NewAccount) -> AuthResult<User> {
        let email = normalize_email(&account.email);
        if !is_plausible_email(&email) {
            return Err(AuthError::InvalidEmail(account.email));
        }
        self.check_password_policy(&account.password)?;

        let password_hash = self.hasher.hash_password(&account.password)?;
        let user = User::new(
            uuid::Uuid::new_v4().to_string(),
            email.clone(),
            account.name.trim(),
            account.role.as_str(),
        );

        let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
        if accounts.contains_key(&email) {
            return Err(AuthError::EmailTaken(email));
        }
        accounts.insert(email, Account { user: user.clone(), password_hash, active: true });

        log::info!("Registered {} account {}", user.role, user.id);
        Ok(user)
    }

    async fn request_password_reset(&self, email: &str) -> AuthResult<Option<ResetToken>> {
        let email = normalize_email(email);
        let known = self.accounts.read().unwrap_or_else(|e| e.into_inner()).contains_key(&email);
        if !known {
            log::debug!("Password reset requested for unknown email");
            return Ok(None);
        }

        let token = ResetToken {
            token: uuid::Uuid::new_v4().to_string(),
            email: email.clone(),
            expires_at: expiry_after(self.reset_ttl),
        };
        self.resets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.token.clone(), PendingReset { email, expires_at: token.expires_at });

        Ok(Some(token))
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> AuthResult<()> {
        let pending = self
            .resets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token)
            .ok_or(AuthError::InvalidResetToken)?;

        if Utc::now() >= pending.expires_at {
            return Err(AuthError::ResetTokenExpired);
        }
        self.check_password_policy(new_password)?;

        let password_hash = self.hasher.hash_password(new_password)?;
        let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
        let account = accounts.get_mut(&pending.email).ok_or(AuthError::InvalidResetToken)?;
        account.password_hash = password_hash;

        log::info!("Password reset completed for account {}", account.user.id);
        Ok(())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grower() -> NewAccount {
        NewAccount {
            email: "Grower@Example.com ".to_string(),
            name: "Orchard Owner".to_string(),
            password: "damson-2026".to_string(),
            role: Role::Farmer,
        }
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let idp = InMemoryIdentityProvider::new();
        let user = idp.register(grower()).await.unwrap();
        assert_eq!(user.email, "grower@example.com");
        assert_eq!(user.role, "farmer");

        let signed_in = idp.authenticate("GROWER@example.com", "damson-2026").await.unwrap();
        assert_eq!(signed_in.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let idp = InMemoryIdentityProvider::new();
        idp.register(grower()).await.unwrap();

        assert!(matches!(
            idp.authenticate("grower@example.com", "greengage").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            idp.authenticate("nobody@example.com", "damson-2026").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn duplicate_and_invalid_registrations_are_rejected() {
        let idp = InMemoryIdentityProvider::new();
        idp.register(grower()).await.unwrap();
        assert!(matches!(idp.register(grower()).await, Err(AuthError::EmailTaken(_))));

        let mut bad_email = grower();
        bad_email.email = "not-an-email".to_string();
        assert!(matches!(idp.register(bad_email).await, Err(AuthError::InvalidEmail(_))));

        let mut short = grower();
        short.email = "other@example.com".to_string();
        short.password = "plum".to_string();
        assert!(matches!(
            idp.register(short).await,
            Err(AuthError::WeakPassword { min_length: 8 })
        ));
        assert_eq!(idp.account_count(), 1);
    }

    #[tokio::test]
    async fn reset_token_is_single_use() {
        let idp = InMemoryIdentityProvider::new();
        idp.register(grower()).await.unwrap();

        let token = idp.request_password_reset("grower@example.com").await.unwrap().unwrap();
        idp.reset_password(&token.token, "mirabelle-99").await.unwrap();

        assert!(idp.authenticate("grower@example.com", "mirabelle-99").await.is_ok());
        assert!(idp.authenticate("grower@example.com", "damson-2026").await.is_err());
        assert!(matches!(
            idp.reset_password(&token.token, "another-one").await,
            Err(AuthError::InvalidResetToken)
        ));
    }

    #[tokio::test]
    async fn expired_reset_token_is_rejected() {
        let idp = InMemoryIdentityProvider::new().with_reset_ttl(Duration::seconds(-1));
        idp.register(grower()).await.unwrap();

        let token = idp.request_password_reset("grower@example.com").await.unwrap().unwrap();
        assert!(matches!(
            idp.reset_password(&token.token, "mirabelle-99").await,
            Err(AuthError::ResetTokenExpired)
        ));
    }

    #[tokio::test]
    async fn reset_for_unknown_email_reveals_nothing() {
        let idp = InMemoryIdentityProvider::new();
        assert!(idp.request_password_reset("ghost@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn disabled_account_cannot_sign_in() {
        let idp = InMemoryIdentityProvider::new();
        idp.register(grower()).await.unwrap();
        assert!(idp.set_active("grower@example.com", false));

        assert!(matches!(
            idp.authenticate("grower@example.com", "damson-2026").await,
            Err(AuthError::AccountDisabled(_))
        ));
    }
}
