//! Argon2id password hashing for the identity provider

use crate::error::PasswordError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Password hasher using Argon2id with the crate's default parameters
pub struct PasswordHasherService {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasherService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherService {
    pub fn new() -> Self {
        Self { argon2: Argon2::default() }
    }

    /// Hash a password into a PHC string (`$argon2id$v=19$...`)
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored PHC hash
    ///
    /// A wrong password is `Ok(false)`; only malformed hashes are errors.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let hasher = PasswordHasherService::new();
        let hash = hasher.hash_password("plums-are-purple").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("plums-are-purple", &hash).unwrap());
        assert!(!hasher.verify_password("plums-are-green", &hash).unwrap());
    }

    #[test]
    fn same_password_different_salt() {
        let hasher = PasswordHasherService::new();
        let a = hasher.hash_password("password1").unwrap();
        let b = hasher.hash_password("password1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let hasher = PasswordHasherService::new();
        assert!(matches!(
            hasher.verify_password("x", "not-a-phc-string"),
            Err(PasswordError::InvalidHash(_))
        ));
    }
}
