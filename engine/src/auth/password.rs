//! Account password hashing (argon2id, default parameters)

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt::Display;
use vitality_shared::AuthError;

fn unavailable(context: &str, err: impl Display) -> AuthError {
    AuthError::Unavailable(format!("{}: {}", context, err))
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| unavailable("Failed to hash password", e))
    }

    /// `Ok(false)` for a wrong password; `Err` only for an unreadable stored hash
    pub fn verify(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| unavailable("Stored password hash is unreadable", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    pub async fn hash_async(password: String) -> Result<String, AuthError> {
        Self::on_blocking_pool(move || Self::hash(&password)).await
    }

    pub async fn verify_async(password: String, stored_hash: String) -> Result<bool, AuthError> {
        Self::on_blocking_pool(move || Self::verify(&password, &stored_hash)).await
    }

    async fn on_blocking_pool<T, F>(work: F) -> Result<T, AuthError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    {
        tokio::task::spawn_blocking(work)
            .await
            .map_err(|e| unavailable("Password task failed", e))?
    }
}
