//! PostgreSQL implementation of [`EventStore`].

use async_trait::async_trait;
use eventhub_core::event::EventRecord;
use eventhub_core::event_store::{EventStore, ReplaceOutcome, StoreError, StoredEvent};
use eventhub_core::types::DbId;
use sqlx::PgPool;

use crate::{is_connectivity_error, is_statement_timeout};
use crate::models::event::{EventRow, PhotoColumns};

/// Column list for single-event queries.
const COLUMNS: &str = "id, version, name, owner, event_date, event_hour, organizer, address, \
     description, foods, drinks, value, photo_url, photo_content_type, photo_file_name, \
     photo_data, octet_length(photo_data)::BIGINT AS photo_size, link_reference, link_address, \
     created_at, updated_at";

/// Column list for listings: photo bytes stay in the database.
const LIST_COLUMNS: &str = "id, version, name, owner, event_date, event_hour, organizer, \
     address, description, foods, drinks, value, photo_url, photo_content_type, \
     photo_file_name, NULL::BYTEA AS photo_data, \
     octet_length(photo_data)::BIGINT AS photo_size, link_reference, link_address, \
     created_at, updated_at";

/// Events stored in the `events` table.
///
/// Replace is a single `UPDATE ... WHERE id = $1 AND version = $2`, so two
/// writers holding the same version cannot both succeed.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_error(err: sqlx::Error) -> StoreError {
    if is_connectivity_error(&err) || is_statement_timeout(&err) {
        tracing::warn!(error = %err, "Event store unreachable");
        StoreError::Unavailable(err.to_string())
    } else {
        tracing::error!(error = %err, "Event store query failed");
        StoreError::Backend(err.to_string())
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list(&self) -> Result<Vec<StoredEvent>, StoreError> {
        let query = format!("SELECT {LIST_COLUMNS} FROM events ORDER BY id ASC");
        let rows = sqlx::query_as::<_, EventRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(StoredEvent::from).collect())
    }

    async fn find(&self, id: DbId) -> Result<Option<StoredEvent>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(row.map(StoredEvent::from))
    }

    async fn insert(&self, record: &EventRecord) -> Result<StoredEvent, StoreError> {
        let query = format!(
            "INSERT INTO events (name, owner, event_date, event_hour, organizer, address, \
                 description, foods, drinks, value, photo_url, photo_content_type, \
                 photo_file_name, photo_data, link_reference, link_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        let photo = PhotoColumns::of(record);
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(&record.name)
            .bind(&record.owner)
            .bind(record.date)
            .bind(record.hour)
            .bind(&record.organizer)
            .bind(&record.address)
            .bind(&record.description)
            .bind(&record.foods)
            .bind(&record.drinks)
            .bind(record.value)
            .bind(photo.url)
            .bind(photo.content_type)
            .bind(photo.file_name)
            .bind(photo.data)
            .bind(&record.link_reference)
            .bind(&record.link_address)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(row.into())
    }

    async fn replace(
        &self,
        id: DbId,
        expected_version: i64,
        record: &EventRecord,
    ) -> Result<ReplaceOutcome, StoreError> {
        let query = format!(
            "UPDATE events SET
                name = $3,
                owner = $4,
                event_date = $5,
                event_hour = $6,
                organizer = $7,
                address = $8,
                description = $9,
                foods = $10,
                drinks = $11,
                value = $12,
                photo_url = $13,
                photo_content_type = $14,
                photo_file_name = $15,
                photo_data = $16,
                link_reference = $17,
                link_address = $18,
                version = version + 1,
                updated_at = NOW()
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        let photo = PhotoColumns::of(record);
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(&record.name)
            .bind(&record.owner)
            .bind(record.date)
            .bind(record.hour)
            .bind(&record.organizer)
            .bind(&record.address)
            .bind(&record.description)
            .bind(&record.foods)
            .bind(&record.drinks)
            .bind(record.value)
            .bind(photo.url)
            .bind(photo.content_type)
            .bind(photo.file_name)
            .bind(photo.data)
            .bind(&record.link_reference)
            .bind(&record.link_address)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        if let Some(row) = row {
            return Ok(ReplaceOutcome::Replaced(row.into()));
        }

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(store_error)?;
        if exists {
            tracing::debug!(id, expected_version, "Stale event version on replace");
            Ok(ReplaceOutcome::Stale)
        } else {
            Ok(ReplaceOutcome::Missing)
        }
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}
