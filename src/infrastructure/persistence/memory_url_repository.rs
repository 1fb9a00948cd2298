//! In-memory implementation of the URL store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, info};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Process-local store keyed by alias.
///
/// Inserts go through the map's entry API, which holds the shard lock for the
/// alias while checking and inserting, so two racing saves of the same alias
/// yield exactly one success and one [`AppError::AliasConflict`].
#[derive(Debug)]
pub struct InMemoryUrlRepository {
    records: DashMap<String, UrlRecord>,
    next_id: AtomicI64,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for InMemoryUrlRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn save(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        match self.records.entry(new_record.alias) {
            Entry::Occupied(occupied) => Err(AppError::alias_conflict(
                "store.memory.save",
                occupied.key().as_str(),
            )),
            Entry::Vacant(vacant) => {
                let record = UrlRecord::new(
                    self.next_id.fetch_add(1, Ordering::Relaxed),
                    vacant.key().clone(),
                    new_record.target_url,
                    Utc::now(),
                );
                vacant.insert(record.clone());
                info!(id = record.id, alias = %record.alias, "URL saved");
                Ok(record)
            }
        }
    }

    async fn get(&self, alias: &str) -> Result<UrlRecord, AppError> {
        let record = self
            .records
            .get(alias)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found("store.memory.get", alias))?;

        debug!(alias, target_url = %record.target_url, "URL retrieved");
        Ok(record)
    }

    async fn delete(&self, alias: &str) -> Result<UrlRecord, AppError> {
        let (_, record) = self
            .records
            .remove(alias)
            .ok_or_else(|| AppError::not_found("store.memory.delete", alias))?;

        info!(id = record.id, alias, "URL deleted");
        Ok(record)
    }

    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError> {
        Ok(self.records.contains_key(alias))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
