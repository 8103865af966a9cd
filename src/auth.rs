//! Single-account login check.
//!
//! The password travels in plain text (over TLS when the server has
//! certificates) and is verified here against an Argon2id PHC string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::warn;

use crate::error::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::AuthError(format!("Failed to hash password: {e}")))?;

    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::AuthError(format!("Invalid password hash format: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::AuthError(format!("Password verification failed: {e}"))),
    }
}

/// The one account allowed to log in.
#[derive(Debug, Clone)]
pub struct Account {
    pub username: String,
    password_hash: String,
}

impl Account {
    /// Rejects hashes that are not valid PHC strings up front.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Result<Self, AppError> {
        let password_hash = password_hash.into();
        PasswordHash::new(&password_hash)
            .map_err(|e| AppError::ConfigError(format!("Invalid password hash: {e}")))?;

        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    /// True only for the configured username with the matching password.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        // Always verify so timing does not reveal whether the username matched.
        let password_ok = match verify_password(password, &self.password_hash) {
            Ok(ok) => ok,
            Err(e) => {
                warn!("{}", e);
                false
            }
        };
        username == self.username && password_ok
    }
}
