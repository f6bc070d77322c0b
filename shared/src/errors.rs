//! Error types shared between the engine and its collaborators

use thiserror::Error;

/// Identity collaborator errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    AccountExists,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("No active session")]
    NoSession,

    #[error("{0}")]
    Validation(String),

    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Key-value persistence errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
