//! Error types shared across the access layer
//!
//! The guard itself never fails: denial is a redirect, not an error. These
//! types cover the places where a caller can actually do something about a
//! failure (bad configuration, rejected credentials, storage problems).

use thiserror::Error;

/// Errors raised while parsing roles and permissions at the config boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RbacError {
    /// Role name outside the closed farmer/technician/admin set
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Permission identifier that no `Permission` variant carries
    #[error("unknown permission: {0}")]
    UnknownPermission(String),
}

/// Password hashing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash is not a valid PHC string
    #[error("invalid password hash: {0}")]
    InvalidHash(String),

    /// Verification failed for a reason other than a wrong password
    #[error("password verification failed: {0}")]
    VerificationFailed(String),
}

/// Errors surfaced by the identity provider and the session provider
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair did not match an active account
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Registration attempted with an email that is already taken
    #[error("an account already exists for {0}")]
    EmailTaken(String),

    /// Registration or reset rejected by the password policy
    #[error("password must be at least {min_length} characters")]
    WeakPassword { min_length: usize },

    /// Registration with a malformed email address
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Reset token unknown or already used
    #[error("password reset token is invalid")]
    InvalidResetToken,

    /// Reset token found but past its expiry
    #[error("password reset token has expired")]
    ResetTokenExpired,

    /// Account exists but has been deactivated
    #[error("account {0} is disabled")]
    AccountDisabled(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Session store back end failure
    #[error("session store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Result alias for identity and session operations
pub type AuthResult<T> = Result<T, AuthError>;
