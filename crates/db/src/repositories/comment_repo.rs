//! Repository for the `comments` table.

use sqlx::PgPool;
use eventhub_core::types::DbId;

use crate::models::comment::{Comment, CreateComment, UpdateComment};

/// Column list shared across queries, with the vote tally computed from
/// `comment_votes`.
const COLUMNS: &str = "c.id, c.author, c.text, c.answer_id, c.created, c.edited, \
     COALESCE((SELECT COUNT(*) FROM comment_votes v WHERE v.comment_id = c.id AND v.weight > 0), 0) AS num_vote_up, \
     COALESCE((SELECT COUNT(*) FROM comment_votes v WHERE v.comment_id = c.id AND v.weight < 0), 0) AS num_vote_down, \
     COALESCE((SELECT SUM(v.weight) FROM comment_votes v WHERE v.comment_id = c.id), 0)::BIGINT AS vote_score, \
     c.created_at, c.updated_at";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO comments (author, text, answer_id, created, edited)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&input.author)
        .bind(&input.text)
        .bind(input.answer_id)
        .bind(input.created)
        .bind(input.edited)
        .fetch_one(pool)
        .await?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a comment by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments c WHERE c.id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all comments ordered by `created` ascending, undated comments last.
    pub async fn list(pool: &PgPool) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments c
             ORDER BY c.created ASC NULLS LAST, c.id ASC"
        );
        sqlx::query_as::<_, Comment>(&query).fetch_all(pool).await
    }

    /// Update a comment. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateComment,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let updated = sqlx::query_scalar::<_, DbId>(
            "UPDATE comments SET
                text = COALESCE($2, text),
                answer_id = COALESCE($3, answer_id),
                created = COALESCE($4, created),
                edited = COALESCE($5, edited),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.text)
        .bind(input.answer_id)
        .bind(input.created)
        .bind(input.edited)
        .fetch_optional(pool)
        .await?;
        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Permanently delete a comment and its votes. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
