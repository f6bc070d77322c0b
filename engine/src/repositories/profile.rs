//! Profile snapshot persistence

use super::migrations::{self, CURRENT_SCHEMA_VERSION, SCHEMA_VERSION_FIELD};
use super::store::KeyValueStore;
use serde_json::{json, Value};
use tracing::{debug, warn};
use vitality_shared::{StorageError, UserProfile};

/// Storage key holding a user's profile
pub fn profile_key(user_id: &str) -> String {
    format!("profile:{}", user_id)
}

/// Profile repository over a key-value store
pub struct ProfileStore;

impl ProfileStore {
    /// Load and migrate a profile
    ///
    /// Returns `Ok(None)` when nothing is stored or the stored record cannot
    /// be read; both send the user to onboarding.
    pub async fn load(
        store: &dyn KeyValueStore,
        user_id: &str,
    ) -> Result<Option<UserProfile>, StorageError> {
        let key = profile_key(user_id);
        let Some(raw) = store.get(&key).await? else {
            debug!(user_id = %user_id, "No stored profile");
            return Ok(None);
        };

        match Self::decode(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(reason) => {
                warn!(user_id = %user_id, key = %key, %reason, "Discarding malformed profile record");
                Ok(None)
            }
        }
    }

    /// Overwrite the stored profile (last write wins)
    pub async fn save(
        store: &dyn KeyValueStore,
        user_id: &str,
        profile: &UserProfile,
    ) -> Result<(), StorageError> {
        store.set(&profile_key(user_id), Self::encode(profile)?).await
    }

    /// Delete the stored profile
    pub async fn reset(store: &dyn KeyValueStore, user_id: &str) -> Result<(), StorageError> {
        store.delete(&profile_key(user_id)).await
    }

    fn decode(raw: &str) -> Result<UserProfile, String> {
        let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        let migrated = migrations::migrate(value).map_err(|e| e.to_string())?;
        serde_json::from_value(migrated).map_err(|e| e.to_string())
    }

    fn encode(profile: &UserProfile) -> Result<String, StorageError> {
        let mut value = serde_json::to_value(profile)?;
        if let Value::Object(fields) = &mut value {
            fields.insert(SCHEMA_VERSION_FIELD.to_string(), json!(CURRENT_SCHEMA_VERSION));
        }
        Ok(value.to_string())
    }
}
