//! Repository for the `comment_votes` table.

use eventhub_core::comment::{VoteDirection, VoteTally};
use eventhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::CommentVote;

/// One vote per voter per comment; voting again switches direction.
pub struct CommentVoteRepo;

impl CommentVoteRepo {
    /// Record `voter`'s vote on a comment, replacing any earlier vote.
    pub async fn cast(
        pool: &PgPool,
        comment_id: DbId,
        voter: &str,
        direction: VoteDirection,
    ) -> Result<CommentVote, sqlx::Error> {
        sqlx::query_as::<_, CommentVote>(
            "INSERT INTO comment_votes (comment_id, voter, weight)
             VALUES ($1, $2, $3)
             ON CONFLICT (comment_id, voter)
             DO UPDATE SET weight = EXCLUDED.weight, created_at = NOW()
             RETURNING comment_id, voter, weight",
        )
        .bind(comment_id)
        .bind(voter)
        .bind(direction.weight())
        .fetch_one(pool)
        .await
    }

    /// Withdraw `voter`'s vote. Returns `true` if a vote was removed.
    pub async fn withdraw(pool: &PgPool, comment_id: DbId, voter: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comment_votes WHERE comment_id = $1 AND voter = $2")
            .bind(comment_id)
            .bind(voter)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Aggregate the votes for a comment.
    pub async fn tally(pool: &PgPool, comment_id: DbId) -> Result<VoteTally, sqlx::Error> {
        let (up, down) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT
                COUNT(*) FILTER (WHERE weight > 0),
                COUNT(*) FILTER (WHERE weight < 0)
             FROM comment_votes WHERE comment_id = $1",
        )
        .bind(comment_id)
        .fetch_one(pool)
        .await?;
        Ok(VoteTally::from_counts(up, down))
    }
}
