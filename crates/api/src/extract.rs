//! Request body extraction for event drafts.
//!
//! Events arrive either as JSON or as `multipart/form-data`. Both forms are
//! turned into the same [`EventDraft`]; nothing is validated here beyond
//! body framing, so absent fields stay absent for the validation engine.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use eventhub_core::event::{EventDraft, PhotoInput, PhotoUpload};
use eventhub_core::validation::fields::media_type_essence;
use serde::Deserialize;

use crate::error::AppError;

/// JSON body for event create/replace.
///
/// Wire names follow the existing web clients; the short names are accepted as
/// aliases.
#[derive(Debug, Default, Deserialize)]
pub struct EventForm {
    #[serde(rename = "eventName", alias = "name")]
    pub name: Option<String>,
    #[serde(rename = "ownerName", alias = "owner")]
    pub owner: Option<String>,
    #[serde(rename = "eventDate", alias = "date")]
    pub date: Option<String>,
    #[serde(rename = "eventHour", alias = "hour")]
    pub hour: Option<String>,
    pub organizer: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "eventDescription", alias = "description")]
    pub description: Option<String>,
    pub foods: Option<String>,
    pub drinks: Option<String>,
    /// A JSON number or a numeric string.
    pub value: Option<serde_json::Value>,
    pub photo: Option<String>,
    #[serde(rename = "linkReference")]
    pub link_reference: Option<String>,
    #[serde(rename = "linkAddress")]
    pub link_address: Option<String>,
}

impl From<EventForm> for EventDraft {
    fn from(form: EventForm) -> Self {
        EventDraft {
            name: form.name,
            owner: form.owner,
            date: form.date,
            hour: form.hour,
            organizer: form.organizer,
            address: form.address,
            description: form.description,
            foods: form.foods,
            drinks: form.drinks,
            value: form.value.and_then(raw_scalar),
            photo: form.photo.map(PhotoInput::Url).unwrap_or_default(),
            link_reference: form.link_reference,
            link_address: form.link_address,
        }
    }
}

/// Render a JSON scalar as the raw text the engine parses.
fn raw_scalar(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// The text slot in `draft` that a form field name maps to.
fn text_slot<'a>(draft: &'a mut EventDraft, name: &str) -> Option<&'a mut Option<String>> {
    let slot = match name {
        "eventName" | "name" => &mut draft.name,
        "ownerName" | "owner" => &mut draft.owner,
        "eventDate" | "date" => &mut draft.date,
        "eventHour" | "hour" => &mut draft.hour,
        "organizer" => &mut draft.organizer,
        "address" => &mut draft.address,
        "eventDescription" | "description" => &mut draft.description,
        "foods" => &mut draft.foods,
        "drinks" => &mut draft.drinks,
        "value" => &mut draft.value,
        "linkReference" => &mut draft.link_reference,
        "linkAddress" => &mut draft.link_address,
        _ => return None,
    };
    Some(slot)
}

/// Build a draft from a multipart body.
///
/// A `photo` part with a filename is an upload; without one it is a URL.
/// Unknown parts are ignored.
pub async fn draft_from_multipart(mut multipart: Multipart) -> Result<EventDraft, AppError> {
    let mut draft = EventDraft::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "photo" {
            let incoming = if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                PhotoInput::Upload(PhotoUpload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                })
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                PhotoInput::Url(text)
            };
            draft.photo = std::mem::take(&mut draft.photo).supply(incoming);
            continue;
        }

        if text_slot(&mut draft, &name).is_none() {
            continue;
        }
        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if let Some(slot) = text_slot(&mut draft, &name) {
            *slot = Some(text);
        }
    }

    Ok(draft)
}

/// Extractor yielding an [`EventDraft`] from a JSON or multipart body.
pub struct EventDraftBody(pub EventDraft);

impl<S> FromRequest<S> for EventDraftBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| media_type_essence(ct) == "multipart/form-data");

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return draft_from_multipart(multipart).await.map(Self);
        }

        let Json(form) = Json::<EventForm>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Self(form.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_accepts_wire_names_and_aliases() {
        let wire: EventForm = serde_json::from_value(json!({
            "eventName": "Teste",
            "ownerName": "Fulano",
            "eventDate": "2099-12-14",
            "eventHour": "03:03:00",
            "eventDescription": "Chato",
        }))
        .unwrap();
        let short: EventForm = serde_json::from_value(json!({
            "name": "Teste",
            "owner": "Fulano",
            "date": "2099-12-14",
            "hour": "03:03:00",
            "description": "Chato",
        }))
        .unwrap();
        assert_eq!(EventDraft::from(wire), EventDraft::from(short));
    }

    #[test]
    fn value_accepts_numbers_and_strings() {
        let number: EventForm = serde_json::from_value(json!({"value": -2})).unwrap();
        assert_eq!(EventDraft::from(number).value.as_deref(), Some("-2"));

        let text: EventForm = serde_json::from_value(json!({"value": "15"})).unwrap();
        assert_eq!(EventDraft::from(text).value.as_deref(), Some("15"));

        let null: EventForm = serde_json::from_value(json!({"value": null})).unwrap();
        assert_eq!(EventDraft::from(null).value, None);
    }

    #[test]
    fn photo_string_is_a_url_input() {
        let form: EventForm =
            serde_json::from_value(json!({"photo": "https://www.google.com/"})).unwrap();
        assert_eq!(
            EventDraft::from(form).photo,
            PhotoInput::Url("https://www.google.com/".into())
        );
        assert_eq!(EventDraft::from(EventForm::default()).photo, PhotoInput::None);
    }

    #[test]
    fn text_slot_ignores_unknown_names() {
        let mut draft = EventDraft::default();
        assert!(text_slot(&mut draft, "csrfmiddlewaretoken").is_none());
        *text_slot(&mut draft, "eventName").unwrap() = Some("Teste".into());
        assert_eq!(draft.name.as_deref(), Some("Teste"));
    }
}
