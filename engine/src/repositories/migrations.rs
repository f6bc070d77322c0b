//! Versioned upgrades for stored profile records
//!
//! Records are JSON objects carrying a `schemaVersion` field. Records written
//! before versioning existed have no such field and count as version 1.

use serde_json::{json, Map, Value};
use thiserror::Error;

pub const CURRENT_SCHEMA_VERSION: u64 = 3;

pub const SCHEMA_VERSION_FIELD: &str = "schemaVersion";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    #[error("profile record is not a JSON object")]
    NotAnObject,

    #[error("schema version field is not a positive integer")]
    InvalidVersion,

    #[error("record version ({found}) is newer than supported schema ({supported})")]
    Unsupported { found: u64, supported: u64 },
}

/// Bring a raw record up to [`CURRENT_SCHEMA_VERSION`]
///
/// Running this on an already current record returns it unchanged.
pub fn migrate(record: Value) -> Result<Value, MigrationError> {
    let Value::Object(mut fields) = record else {
        return Err(MigrationError::NotAnObject);
    };

    let mut version = match fields.get(SCHEMA_VERSION_FIELD) {
        None | Some(Value::Null) => 1,
        Some(v) => v
            .as_u64()
            .filter(|v| *v >= 1)
            .ok_or(MigrationError::InvalidVersion)?,
    };

    if version > CURRENT_SCHEMA_VERSION {
        return Err(MigrationError::Unsupported {
            found: version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }

    while version < CURRENT_SCHEMA_VERSION {
        let next_version = version + 1;
        apply_migration(&mut fields, next_version);
        version = next_version;
    }

    fields.insert(SCHEMA_VERSION_FIELD.to_string(), json!(CURRENT_SCHEMA_VERSION));
    Ok(Value::Object(fields))
}

fn apply_migration(fields: &mut Map<String, Value>, version: u64) {
    match version {
        // Gamification fields
        2 => {
            backfill_if_falsy(fields, "xp", json!(0));
            backfill_if_falsy(fields, "level", json!(1));
            backfill_if_falsy(fields, "badges", json!([]));
        }
        // Mood journal
        3 => {
            backfill_if_falsy(fields, "moodLogs", json!([]));
        }
        _ => {}
    }
}

/// Missing, null, false, zero and empty-string values are replaced
fn backfill_if_falsy(fields: &mut Map<String, Value>, key: &str, default: Value) {
    let falsy = match fields.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if falsy {
        fields.insert(key.to_string(), default);
    }
}
