//! Identity provider backed by the engine's own key-value store

use super::{IdentityProvider, JwtService, PasswordService, Session};
use crate::repositories::KeyValueStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vitality_shared::validation::{validate_email, validate_password};
use vitality_shared::{AuthError, StorageError};

/// Key holding the token of the active session
pub const SESSION_KEY: &str = "auth:session";

fn account_key(email: &str) -> String {
    format!("account:{}", email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn unavailable(err: StorageError) -> AuthError {
    AuthError::Unavailable(err.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRecord {
    user_id: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

pub struct LocalIdentityProvider {
    store: Arc<dyn KeyValueStore>,
    jwt: JwtService,
    session_tx: watch::Sender<Option<Session>>,
}

impl LocalIdentityProvider {
    pub fn new(store: Arc<dyn KeyValueStore>, jwt: JwtService) -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            store,
            jwt,
            session_tx,
        }
    }

    /// Resume the session saved by a previous run, if its token is still valid
    pub async fn restore(&self) -> Result<Option<Session>, AuthError> {
        let Some(token) = self.store.get(SESSION_KEY).await.map_err(unavailable)? else {
            return Ok(None);
        };

        match self.jwt.validate_session_token(&token) {
            Ok(claims) => {
                let session = Session {
                    user_id: claims.sub,
                    email: claims.email,
                    access_token: token,
                };
                info!(user_id = %session.user_id, "Restored saved session");
                self.session_tx.send_replace(Some(session.clone()));
                Ok(Some(session))
            }
            Err(e) => {
                warn!("Discarding saved session: {}", e);
                self.store.delete(SESSION_KEY).await.map_err(unavailable)?;
                Ok(None)
            }
        }
    }

    async fn find_account(&self, email: &str) -> Result<Option<AccountRecord>, AuthError> {
        let Some(raw) = self.store.get(&account_key(email)).await.map_err(unavailable)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AuthError::Unavailable(format!("Corrupt account record: {}", e)))
    }

    async fn start_session(&self, account: &AccountRecord) -> Result<Session, AuthError> {
        let token = self
            .jwt
            .generate_session_token(&account.user_id, Some(&account.email))
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        self.store
            .set(SESSION_KEY, token.clone())
            .await
            .map_err(unavailable)?;

        let session = Session {
            user_id: account.user_id.clone(),
            email: Some(account.email.clone()),
            access_token: token,
        };
        self.session_tx.send_replace(Some(session.clone()));
        Ok(session)
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn current_session(&self) -> Option<Session> {
        self.session_tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email);
        let account = self
            .find_account(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid =
            PasswordService::verify_async(password.to_string(), account.password_hash.clone()).await?;
        if !valid {
            debug!(email = %email, "Rejected sign-in");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %account.user_id, "User signed in");
        self.start_session(&account).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email);
        validate_email(&email).map_err(AuthError::Validation)?;
        validate_password(password).map_err(AuthError::Validation)?;

        if self.find_account(&email).await?.is_some() {
            return Err(AuthError::AccountExists);
        }

        let password_hash = PasswordService::hash_async(password.to_string()).await?;

        let account = AccountRecord {
            user_id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash,
            created_at: Utc::now(),
        };
        let record = serde_json::to_string(&account)
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        self.store
            .set(&account_key(&email), record)
            .await
            .map_err(unavailable)?;

        info!(user_id = %account.user_id, "Account created");
        self.start_session(&account).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.store.delete(SESSION_KEY).await.map_err(unavailable)?;
        if let Some(previous) = self.session_tx.send_replace(None) {
            info!(user_id = %previous.user_id, "User signed out");
        }
        Ok(())
    }
}
