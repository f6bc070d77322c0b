//! Identity collaborator
//!
//! The engine only sees [`IdentityProvider`]. [`LocalIdentityProvider`] keeps
//! accounts in the key-value store with argon2 password hashes and issues
//! JWT session tokens.

mod jwt;
mod local;
mod password;

pub use jwt::{Claims, JwtService};
pub use local::LocalIdentityProvider;
pub use password::PasswordService;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use vitality_shared::AuthError;

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub access_token: String,
}

impl Session {
    /// Name offered on the onboarding form: the email's local part
    pub fn suggested_name(&self) -> String {
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|local| !local.is_empty())
            .unwrap_or("User")
            .to_string()
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn current_session(&self) -> Option<Session>;

    /// Receiver that observes every session change
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}
