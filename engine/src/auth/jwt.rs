//! Session token issuing and validation
//!
//! Keys are derived once from the configured secret and shared behind `Arc`.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SESSION_TOKEN_TYPE: &str = "session";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub token_type: String,
}

#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Issues and checks session tokens
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    session_expiry_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, session_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            session_expiry_secs,
        }
    }

    /// Generate a session token for a user
    pub fn generate_session_token(&self, user_id: &str, email: Option<&str>) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.session_expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: SESSION_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate session token: {}", e))
    }

    /// Validate a session token and return its claims
    pub fn validate_session_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        if token_data.claims.token_type != SESSION_TOKEN_TYPE {
            return Err(anyhow::anyhow!("Not a session token"));
        }
        Ok(token_data.claims)
    }

    pub fn session_expiry_secs(&self) -> i64 {
        self.session_expiry_secs
    }
}
