//! Visit-driven progression: experience, levels, and achievement grants.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::db::Database;
use crate::error::{Error, Result};

/// Experience awarded per recorded visit.
pub const XP_PER_VISIT: i64 = 10;

/// Experience required to leave level L is `L * LEVEL_UP_XP_FACTOR`.
pub const LEVEL_UP_XP_FACTOR: i64 = 100;

/// Level thresholds and the badges they unlock.
pub const ACHIEVEMENT_CATALOG: &[(i64, &str, &str)] = &[
    (3, "Новичок", "Поздравляем с достижением 3 уровня!"),
    (5, "Любитель", "Вы достигли 5 уровня! Так держать!"),
    (10, "Профессионал", "10 уровень - впечатляющий результат!"),
];

/// What a single recorded visit changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitOutcome {
    /// Experience total after the award.
    pub experience: i64,
    /// Level after the (at most one) promotion check.
    pub level: i64,
    pub leveled_up: bool,
    /// Achievement names granted by this visit, possibly empty.
    pub new_achievements: Vec<String>,
}

/// Progress toward the next level-up threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub threshold: i64,
    pub percent: i64,
    /// Filled cells of a 10-segment bar.
    pub filled_segments: usize,
}

/// Gamification rules engine. Owns the invariants over a user's
/// experience, level, and achievements; never formats user-facing text.
#[derive(Debug, Clone, Copy)]
pub struct Progression {
    xp_per_visit: i64,
    level_up_factor: i64,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            xp_per_visit: XP_PER_VISIT,
            level_up_factor: LEVEL_UP_XP_FACTOR,
        }
    }
}

impl Progression {
    pub fn new(xp_per_visit: i64, level_up_factor: i64) -> Self {
        Self {
            xp_per_visit: xp_per_visit.max(0),
            level_up_factor: level_up_factor.max(1),
        }
    }

    pub fn xp_per_visit(&self) -> i64 {
        self.xp_per_visit
    }

    /// Record a visit and apply its gamification effects as one
    /// transaction: append the visit row, award experience, stamp the
    /// activity date, run the promotion check, and grant any unlocked
    /// achievement. Nothing is observable until commit.
    ///
    /// The promotion check runs once, against the experience total as it
    /// stands after this visit's award. A user whose accumulated total
    /// clears several thresholds still advances a single level per visit.
    pub async fn record_visit(
        &self,
        db: &Database,
        user_id: i64,
        facility_id: i64,
        activity: &str,
    ) -> Result<VisitOutcome> {
        let now = Utc::now();
        let mut tx = db.pool().begin().await?;

        sqlx::query(
            "INSERT INTO visits (user_id, facility_id, visit_date, activity) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(facility_id)
        .bind(now.timestamp())
        .bind(activity)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE users
            SET experience_points = experience_points + ?,
                last_activity_date = ?
            WHERE user_id = ?
            "#,
        )
        .bind(self.xp_per_visit)
        .bind(now.date_naive().to_string())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(Error::NotFound(format!("user {user_id}")));
        }

        let row = sqlx::query("SELECT current_level, experience_points FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        let level: i64 = row.get("current_level");
        let experience: i64 = row.get("experience_points");

        let mut outcome = VisitOutcome {
            experience,
            level,
            leveled_up: false,
            new_achievements: Vec::new(),
        };

        if experience >= level * self.level_up_factor {
            let next_level = level + 1;
            sqlx::query("UPDATE users SET current_level = ? WHERE user_id = ?")
                .bind(next_level)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            outcome.level = next_level;
            outcome.leveled_up = true;

            if let Some((_, name, description)) = ACHIEVEMENT_CATALOG
                .iter()
                .find(|(threshold, _, _)| *threshold == next_level)
            {
                let granted = sqlx::query(
                    r#"
                    INSERT OR IGNORE INTO achievements (user_id, name, granted_at, description)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(user_id)
                .bind(name)
                .bind(now.timestamp())
                .bind(description)
                .execute(&mut *tx)
                .await?;
                if granted.rows_affected() == 1 {
                    outcome.new_achievements.push((*name).to_string());
                }
            }
        }

        tx.commit().await?;

        tracing::debug!(
            user_id,
            facility_id,
            experience = outcome.experience,
            level = outcome.level,
            leveled_up = outcome.leveled_up,
            "visit recorded"
        );

        Ok(outcome)
    }

    /// Progress toward the next level-up threshold. Pure, no I/O.
    pub fn progress(&self, level: i64, experience: i64) -> Progress {
        // Levels are 1-based by construction; the clamp keeps the
        // function total on garbage input.
        let threshold = level.max(1) * self.level_up_factor;
        let percent = (experience * 100 / threshold).clamp(0, 100);
        Progress {
            threshold,
            percent,
            filled_segments: (percent / 10) as usize,
        }
    }
}

#[cfg(test)]
#[path = "progression_tests.rs"]
mod tests;
