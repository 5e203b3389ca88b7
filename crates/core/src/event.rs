//! Event drafts, validated records and the validation engine.
//!
//! A caller submits an [`EventDraft`] (every field raw and possibly absent).
//! [`validate_event`] runs every field rule, collects every violation, and
//! either yields a normalized [`EventRecord`] or the full list of
//! [`FieldError`]s. The engine is pure: no I/O, no shared state.

use chrono::{NaiveDate, NaiveTime};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::types::Timestamp;
use crate::validation::fields::{
    declares_image, is_blank, is_non_negative, is_strictly_future_date,
    is_well_formed_url, parse_date, parse_hour, parse_integer, sniff_image_content_type,
};
use crate::validation::rules::{FieldError, FieldErrorKind};

/// Field names used in [`FieldError::field`], in evaluation order.
pub mod field {
    pub const NAME: &str = "name";
    pub const OWNER: &str = "owner";
    pub const DATE: &str = "date";
    pub const HOUR: &str = "hour";
    pub const ORGANIZER: &str = "organizer";
    pub const ADDRESS: &str = "address";
    pub const DESCRIPTION: &str = "description";
    pub const FOODS: &str = "foods";
    pub const DRINKS: &str = "drinks";
    pub const VALUE: &str = "value";
    pub const PHOTO: &str = "photo";
    pub const LINK_REFERENCE: &str = "linkReference";
    pub const LINK_ADDRESS: &str = "linkAddress";
}

const MSG_REQUIRED: &str = "This field is required.";
const MSG_PAST_DATE: &str = "Event date must be after today.";
const MSG_DATE_FORMAT: &str = "Date has wrong format. Use YYYY-MM-DD.";
const MSG_HOUR_FORMAT: &str = "Time has wrong format. Use hh:mm[:ss].";
const MSG_INTEGER: &str = "A valid integer is required.";
const MSG_NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";
const MSG_URL: &str = "Enter a valid URL.";
const MSG_NOT_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
const MSG_AMBIGUOUS_PHOTO: &str =
    "Supply the photo either as a URL or as an uploaded file, not both.";

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// Untrusted candidate representation of an event, as received.
///
/// Absence is explicit: the engine's required-field rule is the only place
/// that turns `None` into an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub date: Option<String>,
    pub hour: Option<String>,
    pub organizer: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub foods: Option<String>,
    pub drinks: Option<String>,
    pub value: Option<String>,
    pub photo: PhotoInput,
    pub link_reference: Option<String>,
    pub link_address: Option<String>,
}

/// The two ways a caller may supply a photo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PhotoInput {
    #[default]
    None,
    Url(String),
    Upload(PhotoUpload),
    /// More than one photo was supplied in the same request.
    Conflicting,
}

impl PhotoInput {
    /// Combine a newly received photo with whatever was received before.
    ///
    /// Blank inputs count as nothing; any second real photo makes the input
    /// [`PhotoInput::Conflicting`].
    pub fn supply(self, incoming: PhotoInput) -> PhotoInput {
        match (self.without_blank(), incoming.without_blank()) {
            (PhotoInput::None, incoming) => incoming,
            (current, PhotoInput::None) => current,
            _ => PhotoInput::Conflicting,
        }
    }

    /// Drop blank URLs and empty unnamed uploads.
    ///
    /// A form whose file input was left empty still sends a part with no
    /// filename and no bytes; that means "no photo".
    fn without_blank(self) -> PhotoInput {
        match self {
            PhotoInput::Url(url) if is_blank(&url) => PhotoInput::None,
            PhotoInput::Upload(upload) if upload.is_blank() => PhotoInput::None,
            other => other,
        }
    }
}

/// A binary photo payload with its declared metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl PhotoUpload {
    /// No bytes and no file name.
    pub fn is_blank(&self) -> bool {
        self.data.is_empty() && self.file_name.as_deref().map_or(true, is_blank)
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A validated event. Only [`validate_event`] constructs one from caller input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(rename = "eventName")]
    pub name: String,
    #[serde(rename = "ownerName")]
    pub owner: String,
    #[serde(rename = "eventDate")]
    pub date: NaiveDate,
    #[serde(rename = "eventHour")]
    pub hour: NaiveTime,
    pub organizer: String,
    pub address: String,
    #[serde(rename = "eventDescription")]
    pub description: String,
    pub foods: String,
    pub drinks: String,
    pub value: Option<i64>,
    pub photo: Option<Photo>,
    pub link_reference: Option<String>,
    pub link_address: Option<String>,
}

/// A validated photo, in whichever form it was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Photo {
    Url(String),
    Upload {
        /// Sniffed from the payload, so always an `image/*` type.
        content_type: String,
        file_name: Option<String>,
        /// Payload length in bytes.
        size: u64,
        /// The payload itself. `None` in listings, which only report `size`.
        data: Option<Vec<u8>>,
    },
}

impl Photo {
    /// An upload photo holding `data`.
    pub fn upload(content_type: impl Into<String>, file_name: Option<String>, data: Vec<u8>) -> Self {
        Photo::Upload {
            content_type: content_type.into(),
            file_name,
            size: data.len() as u64,
            data: Some(data),
        }
    }

    /// Drop upload bytes, keeping the size.
    pub fn without_data(self) -> Self {
        match self {
            Photo::Upload {
                content_type,
                file_name,
                size,
                ..
            } => Photo::Upload {
                content_type,
                file_name,
                size,
                data: None,
            },
            url => url,
        }
    }
}

impl Serialize for Photo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Photo::Url(url) => {
                let mut s = serializer.serialize_struct("Photo", 2)?;
                s.serialize_field("kind", "url")?;
                s.serialize_field("url", url)?;
                s.end()
            }
            Photo::Upload {
                content_type,
                file_name,
                size,
                ..
            } => {
                let mut s = serializer.serialize_struct("Photo", 4)?;
                s.serialize_field("kind", "upload")?;
                s.serialize_field("contentType", content_type)?;
                s.serialize_field("fileName", file_name)?;
                s.serialize_field("size", size)?;
                s.end()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Run every event rule against `draft`.
///
/// All rules run; errors accumulate in field order. On success every string
/// is trimmed and `date`/`hour` are parsed.
pub fn validate_event(draft: EventDraft, now: Timestamp) -> Result<EventRecord, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = required(field::NAME, draft.name, &mut errors);
    let owner = required(field::OWNER, draft.owner, &mut errors);
    let date = required(field::DATE, draft.date, &mut errors)
        .and_then(|raw| check_date(&raw, now, &mut errors));
    let hour = required(field::HOUR, draft.hour, &mut errors)
        .and_then(|raw| check_hour(&raw, &mut errors));
    let organizer = required(field::ORGANIZER, draft.organizer, &mut errors);
    let address = required(field::ADDRESS, draft.address, &mut errors);
    let description = required(field::DESCRIPTION, draft.description, &mut errors);
    let foods = required(field::FOODS, draft.foods, &mut errors);
    let drinks = required(field::DRINKS, draft.drinks, &mut errors);
    let value = optional(draft.value).and_then(|raw| check_value(&raw, &mut errors));
    let photo = check_photo(draft.photo, &mut errors);
    let link_reference = optional(draft.link_reference)
        .and_then(|raw| check_url(field::LINK_REFERENCE, raw, &mut errors));
    let link_address = optional(draft.link_address)
        .and_then(|raw| check_url(field::LINK_ADDRESS, raw, &mut errors));

    let (
        Some(name),
        Some(owner),
        Some(date),
        Some(hour),
        Some(organizer),
        Some(address),
        Some(description),
        Some(foods),
        Some(drinks),
        true,
    ) = (
        name,
        owner,
        date,
        hour,
        organizer,
        address,
        description,
        foods,
        drinks,
        errors.is_empty(),
    )
    else {
        return Err(errors);
    };

    Ok(EventRecord {
        name,
        owner,
        date,
        hour,
        organizer,
        address,
        description,
        foods,
        drinks,
        value,
        photo,
        link_reference,
        link_address,
    })
}

/// Trimmed value of a required field, or a `MissingField` error.
fn required(name: &str, raw: Option<String>, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = optional(raw);
    if value.is_none() {
        errors.push(FieldError::new(name, FieldErrorKind::MissingField, MSG_REQUIRED));
    }
    value
}

/// Trimmed value of an optional field; blank counts as absent.
fn optional(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_date(raw: &str, now: Timestamp, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    let Some(date) = parse_date(raw) else {
        errors.push(FieldError::new(field::DATE, FieldErrorKind::InvalidDate, MSG_DATE_FORMAT));
        return None;
    };
    if !is_strictly_future_date(date, now) {
        errors.push(FieldError::new(field::DATE, FieldErrorKind::InvalidDate, MSG_PAST_DATE));
        return None;
    }
    Some(date)
}

fn check_hour(raw: &str, errors: &mut Vec<FieldError>) -> Option<NaiveTime> {
    let hour = parse_hour(raw);
    if hour.is_none() {
        errors.push(FieldError::new(field::HOUR, FieldErrorKind::InvalidFormat, MSG_HOUR_FORMAT));
    }
    hour
}

fn check_value(raw: &str, errors: &mut Vec<FieldError>) -> Option<i64> {
    let Some(value) = parse_integer(raw) else {
        errors.push(FieldError::new(field::VALUE, FieldErrorKind::InvalidFormat, MSG_INTEGER));
        return None;
    };
    if !is_non_negative(value) {
        errors.push(FieldError::new(field::VALUE, FieldErrorKind::NegativeValue, MSG_NEGATIVE));
        return None;
    }
    Some(value)
}

fn check_url(name: &str, raw: String, errors: &mut Vec<FieldError>) -> Option<String> {
    if is_well_formed_url(&raw) {
        Some(raw)
    } else {
        errors.push(FieldError::new(name, FieldErrorKind::MalformedUrl, MSG_URL));
        None
    }
}

fn check_photo(input: PhotoInput, errors: &mut Vec<FieldError>) -> Option<Photo> {
    match input.without_blank() {
        PhotoInput::None => None,
        PhotoInput::Url(raw) => {
            optional(Some(raw)).and_then(|url| check_url(field::PHOTO, url, errors).map(Photo::Url))
        }
        PhotoInput::Upload(upload) => {
            let detected = declares_image(upload.content_type.as_deref())
                .then(|| sniff_image_content_type(&upload.data))
                .flatten();
            match detected {
                Some(content_type) => Some(Photo::upload(
                    content_type,
                    optional(upload.file_name),
                    upload.data,
                )),
                None => {
                    errors.push(FieldError::new(
                        field::PHOTO,
                        FieldErrorKind::UnsupportedMediaType,
                        MSG_NOT_IMAGE,
                    ));
                    None
                }
            }
        }
        PhotoInput::Conflicting => {
            errors.push(FieldError::new(
                field::PHOTO,
                FieldErrorKind::AmbiguousPhoto,
                MSG_AMBIGUOUS_PHOTO,
            ));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
