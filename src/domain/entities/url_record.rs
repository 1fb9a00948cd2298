//! URL record entity.

use chrono::{DateTime, Utc};

/// A persisted mapping from a short alias to its target URL.
///
/// `id` and `created_at` are assigned by the store. The alias never changes
/// once persisted; there is no update operation, only delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub alias: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    pub fn new(id: i64, alias: String, target_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            alias,
            target_url,
            created_at,
        }
    }
}

/// Input data for creating a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub alias: String,
    pub target_url: String,
}

impl NewUrlRecord {
    pub fn new(alias: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            target_url: target_url.into(),
        }
    }
}
