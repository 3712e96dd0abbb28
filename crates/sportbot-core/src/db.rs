//! Database operations for sportbot.

use crate::error::Result;
use crate::models::*;
use crate::schema::SCHEMA;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;

/// Database handle for sportbot.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create a database at the given path.
    pub async fn open(path: &Path) -> Result<Self> {
        let parent = path.parent().unwrap_or(Path::new("."));
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    /// Initialize schema.
    async fn init(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Get the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database.
    pub async fn close(self) {
        self.pool.close().await;
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a user on first contact. Re-registration is a no-op.
    pub async fn register_user(&self, profile: &UserProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, first_name, last_name, registration_date)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO NOTHING
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a user by id.
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    /// Per-user aggregates for the stats view.
    pub async fn user_stats(&self, user_id: i64) -> Result<Option<UserStats>> {
        let row = sqlx::query(
            r#"
            SELECT u.current_level, u.experience_points, u.registration_date,
                   COUNT(v.id) AS visit_count,
                   GROUP_CONCAT(DISTINCT v.activity) AS activities
            FROM users u
            LEFT JOIN visits v ON v.user_id = u.user_id
            WHERE u.user_id = ?
            GROUP BY u.user_id
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| UserStats {
            current_level: row.get("current_level"),
            experience_points: row.get("experience_points"),
            registration_date: timestamp_to_datetime(row.get("registration_date")),
            visit_count: row.get("visit_count"),
            activities: row
                .get::<Option<String>, _>("activities")
                .map(|s| s.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
        }))
    }

    /// User count (diagnostics).
    pub async fn count_users(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    // =========================================================================
    // Facilities
    // =========================================================================

    /// Insert a facility, returning its id. Used by seeding only.
    pub async fn insert_facility(&self, facility: &NewFacility) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO facilities (name, category, address, sports, age_groups, contacts, description)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&facility.name)
        .bind(&facility.category)
        .bind(&facility.address)
        .bind(serde_json::to_string(&facility.sports)?)
        .bind(serde_json::to_string(&facility.age_groups)?)
        .bind(&facility.contacts)
        .bind(&facility.description)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Facilities whose sport and age-group tag sets contain both filters.
    pub async fn search_facilities(&self, sport: &str, age_group: &str) -> Result<Vec<Facility>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM facilities
            WHERE EXISTS (SELECT 1 FROM json_each(facilities.sports) AS s WHERE s.value = ?)
              AND EXISTS (SELECT 1 FROM json_each(facilities.age_groups) AS a WHERE a.value = ?)
            ORDER BY name
            "#,
        )
        .bind(sport)
        .bind(age_group)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(facility_from_row).collect()
    }

    /// A bounded random sample of facilities for prompt context.
    pub async fn sample_facilities(&self, limit: i64) -> Result<Vec<Facility>> {
        let rows = sqlx::query("SELECT * FROM facilities ORDER BY RANDOM() LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(facility_from_row).collect()
    }

    /// Facility count.
    pub async fn count_facilities(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM facilities")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    // =========================================================================
    // Visits
    // =========================================================================

    /// All visits of a user, oldest first.
    pub async fn visits_for_user(&self, user_id: i64) -> Result<Vec<Visit>> {
        let rows = sqlx::query("SELECT * FROM visits WHERE user_id = ? ORDER BY id")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| Visit {
                id: row.get("id"),
                user_id: row.get("user_id"),
                facility_id: row.get("facility_id"),
                visit_date: timestamp_to_datetime(row.get("visit_date")),
                activity: row.get("activity"),
                rating: row.get("rating"),
            })
            .collect())
    }

    /// Visit count.
    pub async fn count_visits(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM visits")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    // =========================================================================
    // Achievements
    // =========================================================================

    /// Grant an achievement. Idempotent: returns true only for a fresh
    /// grant, false when the user already holds the badge.
    pub async fn grant_achievement(
        &self,
        user_id: i64,
        name: &str,
        description: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO achievements (user_id, name, granted_at, description)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(Utc::now().timestamp())
        .bind(description)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// All achievements of a user, newest first.
    pub async fn list_achievements(&self, user_id: i64) -> Result<Vec<Achievement>> {
        let rows = sqlx::query(
            "SELECT * FROM achievements WHERE user_id = ? ORDER BY granted_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Achievement {
                id: row.get("id"),
                user_id: row.get("user_id"),
                name: row.get("name"),
                granted_at: timestamp_to_datetime(row.get("granted_at")),
                description: row.get("description"),
            })
            .collect())
    }

    /// Achievement count.
    pub async fn count_achievements(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM achievements")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Insert an event, returning its id. Used by seeding only.
    pub async fn insert_event(&self, event: &NewSportEvent) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO events (title, description, event_date, location) VALUES (?, ?, ?, ?)",
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_date.timestamp())
        .bind(&event.location)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Future-dated events, soonest first, bounded count.
    pub async fn upcoming_events(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<SportEvent>> {
        let rows = sqlx::query(
            "SELECT * FROM events WHERE event_date >= ? ORDER BY event_date LIMIT ?",
        )
        .bind(now.timestamp())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| SportEvent {
                id: row.get("id"),
                title: row.get("title"),
                description: row.get("description"),
                event_date: timestamp_to_datetime(row.get("event_date")),
                location: row.get("location"),
            })
            .collect())
    }

    /// Event count.
    pub async fn count_events(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}

fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    chrono::DateTime::from_timestamp(ts, 0)
        .unwrap_or_default()
        .with_timezone(&Utc)
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        user_id: row.get("user_id"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        registration_date: timestamp_to_datetime(row.get("registration_date")),
        current_level: row.get("current_level"),
        experience_points: row.get("experience_points"),
        last_activity_date: row
            .get::<Option<String>, _>("last_activity_date")
            .and_then(|s| s.parse::<NaiveDate>().ok()),
    }
}

fn facility_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Facility> {
    Ok(Facility {
        id: row.get("id"),
        name: row.get("name"),
        category: row.get("category"),
        address: row.get("address"),
        sports: serde_json::from_str(row.get::<&str, _>("sports"))?,
        age_groups: serde_json::from_str(row.get::<&str, _>("age_groups"))?,
        contacts: row.get("contacts"),
        description: row.get("description"),
    })
}
