//! Event row model.
//!
//! The photo is spread over four nullable columns: `photo_url` for a URL
//! photo, `photo_content_type`/`photo_file_name`/`photo_data` for an upload.
//! Queries also select `photo_size`; listings leave `photo_data` NULL and
//! rely on it.

use chrono::{NaiveDate, NaiveTime};
use eventhub_core::event::{EventRecord, Photo};
use eventhub_core::event_store::StoredEvent;
use eventhub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: DbId,
    pub version: i64,
    pub name: String,
    pub owner: String,
    pub event_date: NaiveDate,
    pub event_hour: NaiveTime,
    pub organizer: String,
    pub address: String,
    pub description: String,
    pub foods: String,
    pub drinks: String,
    pub value: Option<i64>,
    pub photo_url: Option<String>,
    pub photo_content_type: Option<String>,
    pub photo_file_name: Option<String>,
    pub photo_data: Option<Vec<u8>>,
    pub photo_size: Option<i64>,
    pub link_reference: Option<String>,
    pub link_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<EventRow> for StoredEvent {
    fn from(row: EventRow) -> Self {
        let photo = match (row.photo_url, row.photo_content_type) {
            (Some(url), _) => Some(Photo::Url(url)),
            (None, Some(content_type)) => Some(Photo::Upload {
                content_type,
                file_name: row.photo_file_name,
                size: match &row.photo_data {
                    Some(data) => data.len() as u64,
                    None => row.photo_size.map_or(0, |n| u64::try_from(n).unwrap_or_default()),
                },
                data: row.photo_data,
            }),
            (None, None) => None,
        };
        StoredEvent {
            id: row.id,
            version: row.version,
            record: EventRecord {
                name: row.name,
                owner: row.owner,
                date: row.event_date,
                hour: row.event_hour,
                organizer: row.organizer,
                address: row.address,
                description: row.description,
                foods: row.foods,
                drinks: row.drinks,
                value: row.value,
                photo,
                link_reference: row.link_reference,
                link_address: row.link_address,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Column values for a record's photo, in table order.
#[derive(Debug, Default)]
pub struct PhotoColumns<'a> {
    pub url: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub file_name: Option<&'a str>,
    pub data: Option<&'a [u8]>,
}

impl<'a> PhotoColumns<'a> {
    pub fn of(record: &'a EventRecord) -> Self {
        match &record.photo {
            None => Self::default(),
            Some(Photo::Url(url)) => Self {
                url: Some(url),
                ..Self::default()
            },
            Some(Photo::Upload {
                content_type,
                file_name,
                data,
                ..
            }) => Self {
                url: None,
                content_type: Some(content_type),
                file_name: file_name.as_deref(),
                data: data.as_deref(),
            },
        }
    }
}
