//! Integration tests for the progression engine.

use sportbot_core::Database;
use sportbot_core::models::{NewFacility, UserProfile};
use sportbot_core::progression::Progression;

async fn open_db(dir: &tempfile::TempDir) -> Database {
    Database::open(&dir.path().join("sportbot-test.db"))
        .await
        .expect("open db")
}

async fn setup_user(db: &Database, user_id: i64) {
    db.register_user(&UserProfile::bare(user_id))
        .await
        .expect("register user");
}

async fn setup_facility(db: &Database) -> i64 {
    db.insert_facility(&NewFacility {
        name: "Спортивный комплекс 'Олимп'".to_string(),
        category: "спортивный комплекс".to_string(),
        address: "ул. Спортивная, 15".to_string(),
        sports: vec!["Футбол".to_string()],
        age_groups: vec!["Взрослые (18+)".to_string()],
        contacts: None,
        description: None,
    })
    .await
    .expect("insert facility")
}

async fn set_progress(db: &Database, user_id: i64, level: i64, experience: i64) {
    sqlx::query("UPDATE users SET current_level = ?, experience_points = ? WHERE user_id = ?")
        .bind(level)
        .bind(experience)
        .bind(user_id)
        .execute(db.pool())
        .await
        .expect("set progress");
}

// ============================================================================
// Experience accrual
// ============================================================================

#[tokio::test]
async fn experience_accumulates_per_visit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;
    setup_user(&db, 1).await;
    let facility_id = setup_facility(&db).await;
    let engine = Progression::default();

    for expected in [10, 20, 30] {
        let outcome = engine
            .record_visit(&db, 1, facility_id, "Футбол")
            .await
            .expect("record visit");
        assert_eq!(outcome.experience, expected);
    }

    let user = db.get_user(1).await.expect("get").expect("exists");
    assert_eq!(user.experience_points, 30);
    assert_eq!(user.current_level, 1);
    assert!(user.last_activity_date.is_some());
}

#[tokio::test]
async fn visits_are_recorded_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;
    setup_user(&db, 1).await;
    let facility_id = setup_facility(&db).await;
    let engine = Progression::default();

    engine
        .record_visit(&db, 1, facility_id, "Футбол")
        .await
        .expect("first visit");
    engine
        .record_visit(&db, 1, facility_id, "Плавание")
        .await
        .expect("second visit");

    let visits = db.visits_for_user(1).await.expect("visits");
    assert_eq!(visits.len(), 2);
    assert_eq!(visits[0].activity, "Футбол");
    assert_eq!(visits[1].activity, "Плавание");
}

// ============================================================================
// Level-ups
// ============================================================================

#[tokio::test]
async fn level_up_fires_at_threshold() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;
    setup_user(&db, 1).await;
    let facility_id = setup_facility(&db).await;
    set_progress(&db, 1, 1, 95).await;

    let outcome = Progression::default()
        .record_visit(&db, 1, facility_id, "Футбол")
        .await
        .expect("record visit");

    assert_eq!(outcome.experience, 105);
    assert_eq!(outcome.level, 2);
    assert!(outcome.leveled_up);
}

#[tokio::test]
async fn level_up_stays_below_threshold() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;
    setup_user(&db, 1).await;
    let facility_id = setup_facility(&db).await;
    set_progress(&db, 1, 1, 80).await;

    let outcome = Progression::default()
        .record_visit(&db, 1, facility_id, "Футбол")
        .await
        .expect("record visit");

    assert_eq!(outcome.experience, 90);
    assert_eq!(outcome.level, 1);
    assert!(!outcome.leveled_up);
}

#[tokio::test]
async fn at_most_one_level_per_visit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;
    setup_user(&db, 1).await;
    let facility_id = setup_facility(&db).await;
    // Enough accumulated experience to clear many thresholds at once.
    set_progress(&db, 1, 1, 995).await;

    let outcome = Progression::default()
        .record_visit(&db, 1, facility_id, "Футбол")
        .await
        .expect("record visit");

    assert_eq!(outcome.level, 2);
    let user = db.get_user(1).await.expect("get").expect("exists");
    assert_eq!(user.current_level, 2);
}

// ============================================================================
// Achievements
// ============================================================================

#[tokio::test]
async fn promotion_to_level_three_grants_badge() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;
    setup_user(&db, 1).await;
    let facility_id = setup_facility(&db).await;
    set_progress(&db, 1, 2, 195).await;

    let outcome = Progression::default()
        .record_visit(&db, 1, facility_id, "Футбол")
        .await
        .expect("record visit");

    assert_eq!(outcome.level, 3);
    assert_eq!(outcome.new_achievements, vec!["Новичок".to_string()]);

    let achievements = db.list_achievements(1).await.expect("list");
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0].name, "Новичок");
}

#[tokio::test]
async fn achievement_grants_are_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;
    setup_user(&db, 1).await;

    let fresh = db
        .grant_achievement(1, "Новичок", "Поздравляем с достижением 3 уровня!")
        .await
        .expect("grant");
    let repeat = db
        .grant_achievement(1, "Новичок", "Поздравляем с достижением 3 уровня!")
        .await
        .expect("grant again");

    assert!(fresh);
    assert!(!repeat);
    assert_eq!(db.count_achievements().await.expect("count"), 1);
}

#[tokio::test]
async fn promotion_past_held_badge_grants_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;
    setup_user(&db, 1).await;
    let facility_id = setup_facility(&db).await;
    db.grant_achievement(1, "Новичок", "Поздравляем с достижением 3 уровня!")
        .await
        .expect("pre-grant");
    set_progress(&db, 1, 2, 195).await;

    let outcome = Progression::default()
        .record_visit(&db, 1, facility_id, "Футбол")
        .await
        .expect("record visit");

    assert_eq!(outcome.level, 3);
    assert!(outcome.new_achievements.is_empty());
    assert_eq!(db.count_achievements().await.expect("count"), 1);
}

// ============================================================================
// Atomicity
// ============================================================================

#[tokio::test]
async fn failed_visit_leaves_no_partial_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(&dir).await;
    let facility_id = setup_facility(&db).await;

    // User was never registered: the whole transaction must roll back.
    let result = Progression::default()
        .record_visit(&db, 404, facility_id, "Футбол")
        .await;

    assert!(result.is_err());
    assert_eq!(db.count_visits().await.expect("count"), 0);
}
