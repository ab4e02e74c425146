//! Password hashing (Argon2 default params, PHC string).
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to generate salt: {0}")]
    Salt(String),
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("password task failed: {0}")]
    Task(String),
}

/// `hash_password` on the blocking pool; argon2 is CPU-bound.
pub async fn hash(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

/// `verify_password` on the blocking pool. A failed task counts as a mismatch.
pub async fn verify(hash: String, password: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_password(&hash, &password)).await {
        Ok(ok) => ok,
        Err(err) => {
            tracing::error!(error = %err, "password verification task failed");
            false
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .to_string();

    Ok(phc)
}

/// Returns false for a wrong password and for a stored value that is not a PHC string.
pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
