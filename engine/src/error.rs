//! Engine error handling
//!
//! Every controller operation returns [`EngineResult`]. Errors carry a
//! stable code and a short message for inline display; internal details are
//! logged and never shown.

use thiserror::Error;
use tracing::error;
use vitality_shared::{AuthError, StorageError};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No profile loaded")]
    NoProfile,

    #[error("Not signed in")]
    NoSession,

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "VALIDATION_ERROR",
            EngineError::NoProfile => "NO_PROFILE",
            EngineError::NoSession => "NO_SESSION",
            EngineError::Auth(_) => "AUTH_ERROR",
            EngineError::Storage(_) => "STORAGE_ERROR",
            EngineError::Collaborator(_) => "COLLABORATOR_ERROR",
            EngineError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message suitable for showing next to the form that failed
    pub fn user_message(&self) -> String {
        match self {
            EngineError::Validation(msg) => msg.clone(),
            EngineError::NoProfile => "Finish setting up your profile first".to_string(),
            EngineError::NoSession => "Please sign in first".to_string(),
            EngineError::Auth(AuthError::Unavailable(detail)) => {
                error!("Identity provider error: {}", detail);
                "Sign-in is unavailable right now. Please try again.".to_string()
            }
            EngineError::Auth(err) => err.to_string(),
            EngineError::Storage(err) => {
                error!("Storage error: {:?}", err);
                "Your progress could not be saved. Please try again.".to_string()
            }
            EngineError::Collaborator(detail) => {
                error!("Collaborator error: {}", detail);
                "A connected service is unavailable right now.".to_string()
            }
            EngineError::Internal(err) => {
                error!("Internal error: {:?}", err);
                "Something went wrong".to_string()
            }
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
