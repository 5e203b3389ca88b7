//! Route definitions for the `/comments` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::comment;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// POST   /{id}/upvote       -> upvote
/// POST   /{id}/downvote     -> downvote
/// DELETE /{id}/vote         -> withdraw_vote
/// GET    /{id}/votes        -> votes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(comment::list).post(comment::create))
        .route(
            "/{id}",
            get(comment::get_by_id)
                .put(comment::update)
                .delete(comment::delete),
        )
        .route("/{id}/upvote", post(comment::upvote))
        .route("/{id}/downvote", post(comment::downvote))
        .route("/{id}/vote", delete(comment::withdraw_vote))
        .route("/{id}/votes", get(comment::votes))
}
