//! Engine settings
//!
//! Built-in defaults are overlaid by `config/{RUST_ENV}.toml` when present,
//! then by `VITALITY__SECTION__FIELD` environment variables.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use vitality_shared::DEFAULT_WATER_GOAL_ML;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub identity: IdentityConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub hydration: HydrationConfig,
}

/// Which key-value backend holds profiles and preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Redis,
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub redis_url: String,
    /// Prepended to every key written to Redis
    pub key_prefix: String,
    /// Extra attempts after a failed write before the error is surfaced
    pub persist_retries: u32,
    /// Delay before the first retry; doubles on each further attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_retry_backoff_ms() -> u64 {
    20
}

/// Local identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub jwt_secret: String,
    pub session_expiry_secs: i64,
}

/// AI/LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    pub ollama_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ollama_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationConfig {
    pub daily_goal_ml: u32,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            daily_goal_ml: DEFAULT_WATER_GOAL_ML,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                redis_url: "redis://localhost:6379".to_string(),
                key_prefix: "vitality".to_string(),
                persist_retries: 2,
                retry_backoff_ms: default_retry_backoff_ms(),
            },
            identity: IdentityConfig {
                jwt_secret: "development-secret-change-in-production".to_string(),
                session_expiry_secs: 604800, // 7 days
            },
            ai: AiConfig::default(),
            hydration: HydrationConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let profile_file = format!("config/{}", Self::environment());

        let layered = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&profile_file).required(false))
            // VITALITY__STORAGE__BACKEND=redis -> storage.backend
            .add_source(config::Environment::with_prefix("VITALITY").separator("__"))
            .build()?;

        Ok(layered.try_deserialize()?)
    }

    /// Value of RUST_ENV, "development" when unset
    pub fn environment() -> String {
        env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string())
    }

    pub fn is_production() -> bool {
        Self::environment() == "production"
    }

    /// Problems that make this configuration unfit for production
    pub fn production_errors(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();
        if self.identity.jwt_secret.contains("development") || self.identity.jwt_secret.len() < 32 {
            errors.push("JWT secret must be at least 32 characters and not contain 'development'");
        }
        if self.identity.session_expiry_secs <= 0 {
            errors.push("Session expiry must be positive");
        }
        errors
    }
}
