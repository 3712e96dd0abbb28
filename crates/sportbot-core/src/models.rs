//! Domain models for the sports assistant.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a chat user as the messaging gateway reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserProfile {
    /// Bare profile when only the id is known (e.g. implicit registration).
    pub fn bare(user_id: i64) -> Self {
        Self {
            user_id,
            username: None,
            first_name: None,
            last_name: None,
        }
    }
}

/// A registered user with gamification state.
///
/// `experience_points` and `current_level` are monotonically
/// non-decreasing; rows are never deleted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub current_level: i64,
    pub experience_points: i64,
    pub last_activity_date: Option<NaiveDate>,
}

/// A physical sports venue with sport and age-group tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub address: String,
    pub sports: Vec<String>,
    pub age_groups: Vec<String>,
    pub contacts: Option<String>,
    pub description: Option<String>,
}

/// Facility fields for insertion (id is assigned by the store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFacility {
    pub name: String,
    pub category: String,
    pub address: String,
    pub sports: Vec<String>,
    pub age_groups: Vec<String>,
    pub contacts: Option<String>,
    pub description: Option<String>,
}

/// A user-confirmed attendance at a facility. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    pub id: i64,
    pub user_id: i64,
    pub facility_id: i64,
    pub visit_date: DateTime<Utc>,
    pub activity: String,
    pub rating: Option<i64>,
}

/// A named milestone badge. At most one per (user, name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub granted_at: DateTime<Utc>,
    pub description: String,
}

/// A scheduled sports event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportEvent {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
}

/// Event fields for insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSportEvent {
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
}

/// Per-user aggregates for the stats view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub current_level: i64,
    pub experience_points: i64,
    pub registration_date: DateTime<Utc>,
    pub visit_count: i64,
    /// Distinct activity tags across all recorded visits.
    pub activities: Vec<String>,
}
