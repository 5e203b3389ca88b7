//! Event update controller.
//!
//! [`EventService`] is the only path from caller input into the
//! [`EventStore`]: every create and replace passes [`validate_event`] first,
//! and nothing is written unless the whole draft is accepted.
//!
//! Replace is a full replace. The stored record is always the image of a
//! single validated draft; omitted fields are not merged from the old copy.
//! Concurrent replaces of the same id are serialized by the store's
//! version check: the loser gets [`CoreError::Conflict`].
//!
//! Store calls are bounded by a timeout. Expiry only drops the pending call,
//! so a write the backend already committed stays committed while the caller
//! sees [`CoreError::StorageUnavailable`]. Callers should re-read before
//! retrying; a retried replace with the old version gets a conflict rather
//! than a second write.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::error::CoreError;
use crate::event::{validate_event, EventDraft};
use crate::event_store::{EventStore, ReplaceOutcome, StoreError, StoredEvent};
use crate::types::{DbId, Timestamp};

const ENTITY: &str = "Event";

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => CoreError::StorageUnavailable(msg),
            StoreError::Backend(msg) => CoreError::Internal(msg),
        }
    }
}

/// Validates drafts and applies them to an [`EventStore`].
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
    storage_timeout: Duration,
}

impl EventService {
    /// `storage_timeout` bounds every individual store call.
    pub fn new(store: Arc<dyn EventStore>, storage_timeout: Duration) -> Self {
        Self {
            store,
            storage_timeout,
        }
    }

    pub async fn list(&self) -> Result<Vec<StoredEvent>, CoreError> {
        self.bounded(self.store.list()).await
    }

    pub async fn get(&self, id: DbId) -> Result<StoredEvent, CoreError> {
        self.bounded(self.store.find(id))
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    /// Validate `draft` against the current instant and insert it.
    pub async fn create(&self, draft: EventDraft) -> Result<StoredEvent, CoreError> {
        self.create_at(draft, Utc::now()).await
    }

    pub async fn create_at(&self, draft: EventDraft, now: Timestamp) -> Result<StoredEvent, CoreError> {
        let record = validate_event(draft, now).map_err(CoreError::Invalid)?;
        self.bounded(self.store.insert(&record)).await
    }

    /// Replace the event at `id` with `draft`, validated against the current instant.
    pub async fn replace(&self, id: DbId, draft: EventDraft) -> Result<StoredEvent, CoreError> {
        self.replace_at(id, draft, Utc::now()).await
    }

    /// Replace with an explicit validation instant.
    ///
    /// 1. Look up `id`; absent ⇒ `NotFound` (no validation is attempted).
    /// 2. Validate; rejected ⇒ `Invalid` with every field error, store untouched.
    /// 3. Identical to the stored record ⇒ return it unchanged.
    /// 4. Write if the version read in step 1 is still current.
    pub async fn replace_at(
        &self,
        id: DbId,
        draft: EventDraft,
        now: Timestamp,
    ) -> Result<StoredEvent, CoreError> {
        let current = self.get(id).await?;

        let record = validate_event(draft, now).map_err(CoreError::Invalid)?;

        if record == current.record {
            return Ok(current);
        }

        match self
            .bounded(self.store.replace(id, current.version, &record))
            .await?
        {
            ReplaceOutcome::Replaced(stored) => Ok(stored),
            ReplaceOutcome::Missing => Err(CoreError::NotFound { entity: ENTITY, id }),
            ReplaceOutcome::Stale => Err(CoreError::Conflict(format!(
                "{ENTITY} {id} was modified concurrently; retry the request"
            ))),
        }
    }

    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        if self.bounded(self.store.delete(id)).await? {
            Ok(())
        } else {
            Err(CoreError::NotFound { entity: ENTITY, id })
        }
    }

    /// Run a store call under the storage timeout. An expired call is dropped
    /// and reported as `StorageUnavailable`.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, CoreError> {
        match tokio::time::timeout(self.storage_timeout, call).await {
            Ok(result) => result.map_err(CoreError::from),
            Err(_) => Err(CoreError::StorageUnavailable(format!(
                "storage did not respond within {} ms",
                self.storage_timeout.as_millis()
            ))),
        }
    }
}
