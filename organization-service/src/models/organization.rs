use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// An organization whose detail view is restricted to invited emails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// MongoDB document ID (UUID string)
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name of the organization
    pub name: String,

    pub description: String,

    /// Normalized emails allowed to access the organization.
    #[serde(default)]
    pub invited_emails: HashSet<String>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Create a new organization with an empty invited set.
    pub fn new(name: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            invited_emails: HashSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add an email to the invited set. Returns `false` if it was already there.
    pub fn invite(&mut self, email: String) -> bool {
        let added = self.invited_emails.insert(email);
        if added {
            self.updated_at = Utc::now();
        }
        added
    }

    pub fn is_invited(&self, email: &str) -> bool {
        self.invited_emails.contains(email)
    }

    pub fn apply(&mut self, update: OrganizationUpdate) {
        self.name = update.name;
        self.description = update.description;
        self.updated_at = Utc::now();
    }
}

/// Mutable fields of an organization.
#[derive(Debug, Clone)]
pub struct OrganizationUpdate {
    pub name: String,
    pub description: String,
}
