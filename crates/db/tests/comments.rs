//! Integration tests for comment CRUD, ordering and vote tallies.

use chrono::NaiveDate;
use eventhub_core::comment::{VoteDirection, VoteTally};
use eventhub_db::models::comment::{CreateComment, UpdateComment};
use eventhub_db::repositories::{CommentRepo, CommentVoteRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_comment(text: &str, created: Option<NaiveDate>) -> CreateComment {
    CreateComment {
        author: "User01".to_string(),
        text: text.to_string(),
        answer_id: 0,
        created,
        edited: None,
    }
}

fn day(d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, 1, d)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn list_orders_by_created_with_undated_last(pool: PgPool) {
    CommentRepo::create(&pool, &new_comment("late", day(20))).await.unwrap();
    CommentRepo::create(&pool, &new_comment("undated", None)).await.unwrap();
    CommentRepo::create(&pool, &new_comment("early", day(2))).await.unwrap();

    let texts: Vec<_> = CommentRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.text)
        .collect();
    assert_eq!(texts, ["early", "late", "undated"]);
}

#[sqlx::test]
async fn update_applies_only_given_fields(pool: PgPool) {
    let created = CommentRepo::create(&pool, &new_comment("first", day(1)))
        .await
        .unwrap();
    let update = UpdateComment {
        text: Some("edited".to_string()),
        answer_id: None,
        created: None,
        edited: day(3),
    };

    let updated = CommentRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.text, "edited");
    assert_eq!(updated.created, day(1));
    assert_eq!(updated.edited, day(3));

    assert!(CommentRepo::update(&pool, 999_999, &update).await.unwrap().is_none());
}

#[sqlx::test]
async fn votes_are_one_per_voter(pool: PgPool) {
    let comment = CommentRepo::create(&pool, &new_comment("vote me", None))
        .await
        .unwrap();

    CommentVoteRepo::cast(&pool, comment.id, "ana", VoteDirection::Up).await.unwrap();
    CommentVoteRepo::cast(&pool, comment.id, "bia", VoteDirection::Up).await.unwrap();
    CommentVoteRepo::cast(&pool, comment.id, "ana", VoteDirection::Down).await.unwrap();

    let tally = CommentVoteRepo::tally(&pool, comment.id).await.unwrap();
    assert_eq!(tally, VoteTally::from_counts(1, 1));

    assert!(CommentVoteRepo::withdraw(&pool, comment.id, "ana").await.unwrap());
    let reloaded = CommentRepo::find_by_id(&pool, comment.id).await.unwrap().unwrap();
    assert_eq!(reloaded.num_vote_up, 1);
    assert_eq!(reloaded.num_vote_down, 0);
    assert_eq!(reloaded.vote_score, 1);
}

#[sqlx::test]
async fn delete_removes_comment_and_votes(pool: PgPool) {
    let comment = CommentRepo::create(&pool, &new_comment("bye", None))
        .await
        .unwrap();
    CommentVoteRepo::cast(&pool, comment.id, "ana", VoteDirection::Up).await.unwrap();

    assert!(CommentRepo::delete(&pool, comment.id).await.unwrap());
    assert!(CommentRepo::find_by_id(&pool, comment.id).await.unwrap().is_none());
    assert_eq!(
        CommentVoteRepo::tally(&pool, comment.id).await.unwrap(),
        VoteTally::default()
    );
}
