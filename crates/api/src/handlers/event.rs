//! Handlers for the `/events` resource.
//!
//! Create and replace accept JSON or multipart bodies (see
//! [`EventDraftBody`]) and go through the event service, which validates the
//! whole draft before anything is written.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use eventhub_core::error::CoreError;
use eventhub_core::event::Photo;
use eventhub_core::event_store::StoredEvent;
use eventhub_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::extract::EventDraftBody;
use crate::state::AppState;

/// GET /api/v1/events
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<StoredEvent>>> {
    let events = state.events.list().await?;
    Ok(Json(events))
}

/// POST /api/v1/events
pub async fn create(
    State(state): State<AppState>,
    EventDraftBody(draft): EventDraftBody,
) -> AppResult<(StatusCode, Json<StoredEvent>)> {
    let event = state.events.create(draft).await?;
    tracing::info!(event_id = event.id, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StoredEvent>> {
    let event = state.events.get(id).await?;
    Ok(Json(event))
}

/// PUT /api/v1/events/{id}
///
/// Full replace: every required field must be supplied again.
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    EventDraftBody(draft): EventDraftBody,
) -> AppResult<Json<StoredEvent>> {
    let event = state.events.replace(id, draft).await?;
    tracing::info!(event_id = id, version = event.version, "Event replaced");
    Ok(Json(event))
}

/// DELETE /api/v1/events/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.events.delete(id).await?;
    tracing::info!(event_id = id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/events/{id}/photo
///
/// Serves an uploaded photo. URL photos are only reported in the event body.
pub async fn photo(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Response> {
    let event = state.events.get(id).await?;
    match event.record.photo {
        Some(Photo::Upload {
            content_type,
            data: Some(data),
            ..
        }) => Ok(([(CONTENT_TYPE, content_type)], data).into_response()),
        _ => Err(AppError::Core(CoreError::NotFound {
            entity: "EventPhoto",
            id,
        })),
    }
}
