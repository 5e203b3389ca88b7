//! Comment entity model and DTOs.

use chrono::NaiveDate;
use eventhub_core::comment::VoteDirection;
use eventhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A comment row joined with its vote tally.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: DbId,
    pub author: String,
    pub text: String,
    /// Id of the comment this one answers; `0` for a top-level comment.
    pub answer_id: DbId,
    pub created: Option<NaiveDate>,
    pub edited: Option<NaiveDate>,
    pub num_vote_up: i64,
    pub num_vote_down: i64,
    pub vote_score: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new comment.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    #[validate(length(min = 1, max = 150))]
    pub author: String,
    #[validate(length(min = 1, max = 128))]
    pub text: String,
    /// Defaults to 0 (top-level) if omitted.
    #[serde(default)]
    pub answer_id: DbId,
    pub created: Option<NaiveDate>,
    pub edited: Option<NaiveDate>,
}

impl CreateComment {
    /// Trim text fields so whitespace-only values fail the length rules.
    pub fn normalized(mut self) -> Self {
        self.author = self.author.trim().to_string();
        self.text = self.text.trim().to_string();
        self
    }
}

/// DTO for updating an existing comment. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComment {
    #[validate(length(min = 1, max = 128))]
    pub text: Option<String>,
    pub answer_id: Option<DbId>,
    pub created: Option<NaiveDate>,
    pub edited: Option<NaiveDate>,
}

impl UpdateComment {
    pub fn normalized(mut self) -> Self {
        self.text = self.text.map(|t| t.trim().to_string());
        self
    }
}

/// Body of an upvote/downvote request.
#[derive(Debug, Clone, Deserialize)]
pub struct CastVote {
    pub voter: String,
}

/// A single stored vote.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentVote {
    pub comment_id: DbId,
    pub voter: String,
    pub weight: i16,
}

impl CommentVote {
    pub fn direction(&self) -> VoteDirection {
        if self.weight > 0 {
            VoteDirection::Up
        } else {
            VoteDirection::Down
        }
    }
}
