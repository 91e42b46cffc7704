use crate::error::{AppError, Result};

/// Hashes a password for storage on an account.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        AppError::InternalError
    })
}

/// `Ok(false)` on a wrong password; an error only when the stored hash
/// itself cannot be read.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    bcrypt::verify(password, stored_hash).map_err(|_| {
        AppError::Authentication("Stored credentials are unreadable".to_string())
    })
}
