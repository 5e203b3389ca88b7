//! Handlers for the `/comments` resource and its vote sub-resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use eventhub_core::comment::{normalize_voter, VoteDirection, VoteTally};
use eventhub_core::error::CoreError;
use eventhub_core::types::DbId;
use eventhub_db::models::comment::{CastVote, Comment, CreateComment, UpdateComment};
use eventhub_db::repositories::{CommentRepo, CommentVoteRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Comment",
        id,
    })
}

/// GET /api/v1/comments
///
/// Ordered by `created` ascending.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Comment>>> {
    let comments = CommentRepo::list(&state.pool).await?;
    Ok(Json(comments))
}

/// POST /api/v1/comments
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let input = input.normalized();
    input.validate()?;
    let comment = CommentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/comments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Comment>> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(comment))
}

/// PUT /api/v1/comments/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateComment>,
) -> AppResult<Json<Comment>> {
    let input = input.normalized();
    input.validate()?;
    let comment = CommentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(comment))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if CommentRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Votes sub-resource
// ---------------------------------------------------------------------------

/// Query parameters for withdrawing a vote (`?voter=`).
#[derive(Debug, serde::Deserialize)]
pub struct VoterParams {
    pub voter: String,
}

async fn cast(
    state: &AppState,
    id: DbId,
    input: CastVote,
    direction: VoteDirection,
) -> AppResult<Json<VoteTally>> {
    let voter = normalize_voter(&input.voter)?;
    CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    CommentVoteRepo::cast(&state.pool, id, &voter, direction).await?;
    let tally = CommentVoteRepo::tally(&state.pool, id).await?;
    Ok(Json(tally))
}

/// POST /api/v1/comments/{id}/upvote
pub async fn upvote(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CastVote>,
) -> AppResult<Json<VoteTally>> {
    cast(&state, id, input, VoteDirection::Up).await
}

/// POST /api/v1/comments/{id}/downvote
pub async fn downvote(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CastVote>,
) -> AppResult<Json<VoteTally>> {
    cast(&state, id, input, VoteDirection::Down).await
}

/// DELETE /api/v1/comments/{id}/vote?voter=
///
/// 404 names the comment when it does not exist, and the vote when the
/// voter has none on it.
pub async fn withdraw_vote(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<VoterParams>,
) -> AppResult<StatusCode> {
    let voter = normalize_voter(&params.voter)?;
    CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if CommentVoteRepo::withdraw(&state.pool, id, &voter).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "CommentVote",
            id,
        }))
    }
}

/// GET /api/v1/comments/{id}/votes
pub async fn votes(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<VoteTally>> {
    CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let tally = CommentVoteRepo::tally(&state.pool, id).await?;
    Ok(Json(tally))
}
