//! Database schema for sportbot.

/// SQL schema, applied idempotently on open.
///
/// Sport and age-group tags are JSON string arrays queried with
/// `json_each`. Timestamps are unix seconds; `last_activity_date` is an
/// ISO date string.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY,
    username TEXT,
    first_name TEXT,
    last_name TEXT,
    registration_date INTEGER NOT NULL,
    current_level INTEGER NOT NULL DEFAULT 1,
    experience_points INTEGER NOT NULL DEFAULT 0,
    last_activity_date TEXT
);

CREATE TABLE IF NOT EXISTS facilities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    address TEXT NOT NULL,
    sports JSON NOT NULL DEFAULT '[]',
    age_groups JSON NOT NULL DEFAULT '[]',
    contacts TEXT,
    description TEXT
);

CREATE TABLE IF NOT EXISTS visits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(user_id),
    facility_id INTEGER NOT NULL REFERENCES facilities(id),
    visit_date INTEGER NOT NULL,
    activity TEXT NOT NULL,
    rating INTEGER
);

CREATE INDEX IF NOT EXISTS idx_visits_user ON visits(user_id);

CREATE TABLE IF NOT EXISTS achievements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(user_id),
    name TEXT NOT NULL,
    granted_at INTEGER NOT NULL,
    description TEXT NOT NULL,
    UNIQUE(user_id, name)
);

CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    event_date INTEGER NOT NULL,
    location TEXT
);

CREATE INDEX IF NOT EXISTS idx_events_date ON events(event_date);
"#;
