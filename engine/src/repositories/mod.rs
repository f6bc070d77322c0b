//! Persistence layer
//!
//! Provides the key-value store abstraction and the profile repository
//! built on it.

pub mod migrations;
pub mod profile;
pub mod store;

pub use migrations::{MigrationError, CURRENT_SCHEMA_VERSION};
pub use profile::{profile_key, ProfileStore};
pub use store::{KeyValueStore, MemoryStore, RedisStore};

/// Storage key for the dark-mode preference
pub const THEME_KEY: &str = "theme";
