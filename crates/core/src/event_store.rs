//! Storage boundary for events.
//!
//! [`EventStore`] is what the update controller needs from persistence:
//! lookups, inserts, a version-checked replace and deletes. Each call is
//! atomic per id. `eventhub_db` provides the PostgreSQL implementation;
//! [`MemoryEventStore`] keeps everything in process.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::event::{EventRecord, Photo};
use crate::types::{DbId, Timestamp};

/// An event as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub id: DbId,
    /// Incremented on every successful replace.
    pub version: i64,
    #[serde(flatten)]
    pub record: EventRecord,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StoredEvent {
    /// The event as it appears in listings: upload photos without their bytes.
    pub fn summary(mut self) -> Self {
        self.record.photo = self.record.photo.map(Photo::without_data);
        self
    }
}

/// Result of a version-checked replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced(StoredEvent),
    /// No event with that id exists.
    Missing,
    /// The event exists but its version moved on.
    Stale,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("Storage unreachable: {0}")]
    Unavailable(String),

    #[error("Storage failure: {0}")]
    Backend(String),
}

/// Persistence operations the event controller relies on.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events, ordered by id, as [`StoredEvent::summary`] values.
    async fn list(&self) -> Result<Vec<StoredEvent>, StoreError>;

    async fn find(&self, id: DbId) -> Result<Option<StoredEvent>, StoreError>;

    async fn insert(&self, record: &EventRecord) -> Result<StoredEvent, StoreError>;

    /// Replace the record at `id` only if its version is still `expected_version`.
    async fn replace(
        &self,
        id: DbId,
        expected_version: i64,
        record: &EventRecord,
    ) -> Result<ReplaceOutcome, StoreError>;

    /// Returns `true` if an event was removed.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local [`EventStore`] backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    last_id: DbId,
    rows: BTreeMap<DbId, StoredEvent>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn list(&self) -> Result<Vec<StoredEvent>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().cloned().map(StoredEvent::summary).collect())
    }

    async fn find(&self, id: DbId) -> Result<Option<StoredEvent>, StoreError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, record: &EventRecord) -> Result<StoredEvent, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = Utc::now();
        let stored = StoredEvent {
            id: inner.last_id,
            version: 1,
            record: record.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn replace(
        &self,
        id: DbId,
        expected_version: i64,
        record: &EventRecord,
    ) -> Result<ReplaceOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(stored) = inner.rows.get_mut(&id) else {
            return Ok(ReplaceOutcome::Missing);
        };
        if stored.version != expected_version {
            return Ok(ReplaceOutcome::Stale);
        }
        stored.record = record.clone();
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(ReplaceOutcome::Replaced(stored.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}
