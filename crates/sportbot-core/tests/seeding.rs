//! Integration tests for demo data seeding.

use sportbot_core::{Database, seed};

async fn open_db(dir: &tempfile::TempDir) -> Database {
    Database::open(&dir.path().join("sportbot-test.db"))
        .await
        .expect("open db")
}

#[tokio::test]
async fn seeding_fills_an_empty_store_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;

    assert!(seed::seed_if_empty(&db).await.expect("seed"));
    let facilities = db.count_facilities().await.expect("count");
    let events = db.count_events().await.expect("count");
    assert!(facilities > 0);
    assert!(events > 0);

    // Second run is a no-op.
    assert!(!seed::seed_if_empty(&db).await.expect("seed again"));
    assert_eq!(db.count_facilities().await.expect("count"), facilities);
}

#[tokio::test]
async fn seeded_facilities_are_searchable_by_tags() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;
    seed::seed_if_empty(&db).await.expect("seed");

    let found = db
        .search_facilities("Футбол", "Взрослые (18+)")
        .await
        .expect("search");
    assert!(found.len() >= 2);
    assert!(found.iter().all(|f| f.sports.iter().any(|s| s == "Футбол")));

    let none = db
        .search_facilities("Кёрлинг", "Взрослые (18+)")
        .await
        .expect("search");
    assert!(none.is_empty());
}

#[tokio::test]
async fn seeded_events_are_future_dated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;
    seed::seed_if_empty(&db).await.expect("seed");

    let events = db
        .upcoming_events(chrono::Utc::now(), 10)
        .await
        .expect("events");
    assert!(!events.is_empty());
}
