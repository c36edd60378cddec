use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;

use crate::error::AppError;

/// Failures that are never the caller's fault. A wrong password is not one
/// of them; `verify_password` reports that as `Ok(false)`.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("argon2 could not hash the password: {0}")]
    Hash(password_hash::Error),

    #[error("stored password hash is unreadable: {0}")]
    StoredHash(password_hash::Error),

    #[error("argon2 verification failed: {0}")]
    Verify(password_hash::Error),
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        AppError::Internal(anyhow::Error::new(e))
    }
}

/// Salted argon2 hash in PHC string form, as stored in `users.password_hash`.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError::Hash)
}

pub fn verify_password(plain: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(PasswordError::StoredHash)?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e)),
    }
}
