pub mod comment;
pub mod event;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events                          list, create (JSON or multipart)
/// /events/{id}                     get, full replace, delete
/// /events/{id}/photo               uploaded photo bytes
///
/// /comments                        list, create
/// /comments/{id}                   get, update, delete
/// /comments/{id}/upvote            cast an up vote (POST)
/// /comments/{id}/downvote          cast a down vote (POST)
/// /comments/{id}/vote              withdraw a vote (DELETE, ?voter=)
/// /comments/{id}/votes             vote tally
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", event::router())
        .nest("/comments", comment::router())
}
