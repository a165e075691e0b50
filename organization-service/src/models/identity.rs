//! Identity model - a registered account, unique by email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted account record. The password is only ever stored as an Argon2 hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// MongoDB document ID (UUID string)
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name
    pub name: String,

    /// Normalized (trimmed, lowercase) email; unique across identities
    pub email: String,

    /// Argon2 PHC string
    pub password_hash: String,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}
