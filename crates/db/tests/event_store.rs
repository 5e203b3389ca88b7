//! Integration tests for `PgEventStore` against a real database.

use chrono::{NaiveDate, NaiveTime};
use eventhub_core::event::{EventRecord, Photo};
use eventhub_core::event_store::{EventStore, ReplaceOutcome};
use eventhub_db::event_store::PgEventStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn record(name: &str) -> EventRecord {
    EventRecord {
        name: name.to_string(),
        owner: "Fulano".to_string(),
        date: NaiveDate::from_ymd_opt(2099, 12, 14).unwrap(),
        hour: NaiveTime::from_hms_opt(3, 3, 0).unwrap(),
        organizer: "Fulano".to_string(),
        address: "Here".to_string(),
        description: "Chato".to_string(),
        foods: "Comidas".to_string(),
        drinks: "Bebidas".to_string(),
        value: None,
        photo: Some(Photo::Url("https://www.google.com/".to_string())),
        link_reference: None,
        link_address: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn insert_then_find_round_trips(pool: PgPool) {
    let store = PgEventStore::new(pool);
    let created = store.insert(&record("Teste")).await.unwrap();
    assert_eq!(created.version, 1);

    let found = store.find(created.id).await.unwrap().unwrap();
    assert_eq!(found.record, record("Teste"));
}

#[sqlx::test]
async fn upload_photo_is_persisted(pool: PgPool) {
    let store = PgEventStore::new(pool);
    let mut input = record("Com foto");
    input.photo = Some(Photo::upload(
        "image/png",
        Some("cover.png".to_string()),
        b"\x89PNG\r\n\x1a\n".to_vec(),
    ));

    let created = store.insert(&input).await.unwrap();
    assert_eq!(created.record.photo, input.photo);
    let found = store.find(created.id).await.unwrap().unwrap();
    assert_eq!(found.record.photo, input.photo);
}

#[sqlx::test]
async fn list_reports_upload_size_without_bytes(pool: PgPool) {
    let store = PgEventStore::new(pool);
    let mut input = record("Com foto");
    input.photo = Some(Photo::upload("image/png", None, vec![7; 300]));
    store.insert(&input).await.unwrap();

    let listed = store.list().await.unwrap();
    assert_eq!(
        listed[0].record.photo,
        Some(Photo::Upload {
            content_type: "image/png".to_string(),
            file_name: None,
            size: 300,
            data: None,
        })
    );
}

#[sqlx::test]
async fn replace_bumps_version_and_rejects_stale_writers(pool: PgPool) {
    let store = PgEventStore::new(pool);
    let created = store.insert(&record("Antes")).await.unwrap();

    let outcome = store
        .replace(created.id, created.version, &record("Depois"))
        .await
        .unwrap();
    let ReplaceOutcome::Replaced(replaced) = outcome else {
        panic!("expected replace to succeed, got {outcome:?}");
    };
    assert_eq!(replaced.version, 2);
    assert_eq!(replaced.record.name, "Depois");

    let stale = store
        .replace(created.id, created.version, &record("Tarde"))
        .await
        .unwrap();
    assert_eq!(stale, ReplaceOutcome::Stale);

    let found = store.find(created.id).await.unwrap().unwrap();
    assert_eq!(found.record.name, "Depois");
}

#[sqlx::test]
async fn replace_and_delete_missing_ids(pool: PgPool) {
    let store = PgEventStore::new(pool);
    let outcome = store.replace(999_999, 1, &record("x")).await.unwrap();
    assert_eq!(outcome, ReplaceOutcome::Missing);
    assert!(!store.delete(999_999).await.unwrap());
}

#[sqlx::test]
async fn list_orders_by_id(pool: PgPool) {
    let store = PgEventStore::new(pool);
    store.insert(&record("Primeiro")).await.unwrap();
    store.insert(&record("Segundo")).await.unwrap();

    let names: Vec<_> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.record.name)
        .collect();
    assert_eq!(names, ["Primeiro", "Segundo"]);
}
