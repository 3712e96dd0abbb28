//! Inbound message routing.
//!
//! Maps each inbound command or free-text message to exactly one handler,
//! consulting the dialog store for in-progress flows. The router alone
//! translates typed failures into user-facing text; per-user mutations run
//! under that user's lock, which is released before any generation call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::dialog::{DialogState, SessionStore};
use crate::error::{Error, Result};
use crate::generate::TextGenerator;
use crate::messages;
use crate::models::UserProfile;
use crate::progression::Progression;
use crate::prompts;

/// Facilities sampled into generation context.
const CONTEXT_FACILITIES: i64 = 5;

/// Upcoming events shown by /events.
const EVENTS_SHOWN: i64 = 5;

/// Upcoming events sampled into free-text context.
const CONTEXT_EVENTS: i64 = 3;

/// What an inbound message asks for, decoded once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Help,
    Find,
    /// 1-based index into the last search results; `None` when the
    /// argument is missing or malformed.
    Visit(Option<usize>),
    Stats,
    Achievements,
    Recommend,
    Events,
    Text(String),
}

impl Intent {
    /// Decode a raw inbound message. Commands start with `/`, tolerate an
    /// `@botname` suffix, and match case-insensitively; anything
    /// unrecognized falls through to free text.
    pub fn parse(text: &str) -> Intent {
        let trimmed = text.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Intent::Text(trimmed.to_string());
        };

        let mut parts = rest.split_whitespace();
        let Some(word) = parts.next() else {
            return Intent::Text(trimmed.to_string());
        };
        let command = word.split('@').next().unwrap_or(word).to_ascii_lowercase();

        match command.as_str() {
            "start" => Intent::Start,
            "help" => Intent::Help,
            "find" => Intent::Find,
            "visit" => Intent::Visit(parts.next().and_then(|arg| arg.parse().ok())),
            "stats" => Intent::Stats,
            "achievements" => Intent::Achievements,
            "recommend" => Intent::Recommend,
            "events" => Intent::Events,
            _ => Intent::Text(trimmed.to_string()),
        }
    }

    fn is_command(&self) -> bool {
        !matches!(self, Intent::Text(_))
    }
}

/// Dispatches inbound messages for all users.
pub struct ChatRouter<G> {
    db: Database,
    generator: G,
    sessions: SessionStore,
    progression: Progression,
    min_query_chars: usize,
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl<G: TextGenerator> ChatRouter<G> {
    pub fn new(
        db: Database,
        generator: G,
        progression: Progression,
        session_idle_ttl: Duration,
        min_query_chars: usize,
    ) -> Self {
        Self {
            db,
            generator,
            sessions: SessionStore::new(session_idle_ttl),
            progression,
            min_query_chars,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Handle one inbound message and produce the reply text. This is the
    /// sole entry point; a failure here never affects other users'
    /// in-flight messages.
    pub async fn handle(&self, profile: &UserProfile, text: &str) -> String {
        let intent = Intent::parse(text);
        match self.dispatch(profile, intent).await {
            Ok(reply) => reply,
            Err(Error::Validation(guidance)) => guidance,
            Err(err) => {
                tracing::error!(user_id = profile.user_id, %err, "message handling failed");
                messages::TRY_AGAIN_LATER.to_string()
            }
        }
    }

    async fn dispatch(&self, profile: &UserProfile, intent: Intent) -> Result<String> {
        let user_id = profile.user_id;

        // A command always interrupts an in-progress dialog flow.
        if intent.is_command() {
            let lock = self.user_lock(user_id).await;
            let _guard = lock.lock().await;
            if self.sessions.state(user_id).await != DialogState::Idle {
                self.sessions.cancel_flow(user_id).await;
            }
        }

        match intent {
            Intent::Start => self.handle_start(profile).await,
            Intent::Help => Ok(messages::HELP.to_string()),
            Intent::Find => self.handle_find(user_id).await,
            Intent::Visit(index) => self.handle_visit(profile, index).await,
            Intent::Stats => self.handle_stats(user_id).await,
            Intent::Achievements => self.handle_achievements(user_id).await,
            Intent::Recommend => self.handle_recommend(user_id).await,
            Intent::Events => self.handle_events().await,
            Intent::Text(text) => match self.sessions.state(user_id).await {
                DialogState::AwaitingSportType => self.handle_sport_reply(user_id, &text).await,
                DialogState::AwaitingAgeGroup => self.handle_age_reply(user_id, &text).await,
                DialogState::Idle => self.handle_free_text(user_id, &text).await,
            },
        }
    }

    async fn handle_start(&self, profile: &UserProfile) -> Result<String> {
        {
            let lock = self.user_lock(profile.user_id).await;
            let _guard = lock.lock().await;
            self.db.register_user(profile).await?;
        }

        let prompt = prompts::greeting(profile.first_name.as_deref());
        let greeting = self.generator.complete(&prompt, None).await;
        Ok(format!("{greeting}\n\n{}", messages::COMMAND_OVERVIEW))
    }

    async fn handle_find(&self, user_id: i64) -> Result<String> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        self.sessions.begin_search(user_id).await;
        Ok(messages::SPORT_MENU.to_string())
    }

    async fn handle_sport_reply(&self, user_id: i64, sport: &str) -> Result<String> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        self.sessions.select_sport(user_id, sport).await;
        Ok(messages::AGE_MENU.to_string())
    }

    async fn handle_age_reply(&self, user_id: i64, age_group: &str) -> Result<String> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let Some(sport) = self.sessions.take_pending_sport(user_id).await else {
            return Err(Error::Validation(messages::SPORT_MENU.to_string()));
        };

        tracing::info!(user_id, sport, age_group, "facility search");
        let facilities = self.db.search_facilities(&sport, age_group).await?;
        tracing::info!(user_id, found = facilities.len(), "facility search done");

        if facilities.is_empty() {
            self.sessions.clear(user_id).await;
            return Ok(messages::NO_FACILITIES_FOUND.to_string());
        }

        let reply = messages::facility_list(&facilities);
        self.sessions.attach_results(user_id, facilities).await;
        Ok(reply)
    }

    async fn handle_visit(&self, profile: &UserProfile, index: Option<usize>) -> Result<String> {
        let Some(index) = index else {
            return Err(Error::Validation(messages::VISIT_USAGE.to_string()));
        };

        let lock = self.user_lock(profile.user_id).await;
        let _guard = lock.lock().await;

        let Some(facility) = self.sessions.result_at(profile.user_id, index).await else {
            return Err(Error::Validation(messages::VISIT_BAD_INDEX.to_string()));
        };

        // recordVisit may be a user's first interaction; registration is
        // idempotent so this is safe on every call.
        self.db.register_user(profile).await?;

        let activity = facility
            .sports
            .first()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        let outcome = self
            .progression
            .record_visit(&self.db, profile.user_id, facility.id, &activity)
            .await?;

        Ok(messages::visit_recorded(
            &facility.name,
            self.progression.xp_per_visit(),
            outcome.level,
            outcome.leveled_up,
            &outcome.new_achievements,
        ))
    }

    async fn handle_stats(&self, user_id: i64) -> Result<String> {
        let Some(stats) = self.db.user_stats(user_id).await? else {
            return Ok(messages::NOT_REGISTERED.to_string());
        };

        let progress = self
            .progression
            .progress(stats.current_level, stats.experience_points);

        let registered = stats.registration_date.format("%d.%m.%Y").to_string();
        let motivation = self
            .generator
            .complete(&prompts::stats_motivation(&stats, &registered), None)
            .await;

        Ok(messages::stats_card(&stats, &progress, &motivation))
    }

    async fn handle_achievements(&self, user_id: i64) -> Result<String> {
        let achievements = self.db.list_achievements(user_id).await?;
        if achievements.is_empty() {
            return Ok(messages::NO_ACHIEVEMENTS.to_string());
        }
        Ok(messages::achievement_list(&achievements))
    }

    async fn handle_recommend(&self, user_id: i64) -> Result<String> {
        let stats = self.db.user_stats(user_id).await?;
        let facilities = self.db.sample_facilities(CONTEXT_FACILITIES).await?;

        let (level, activities) = match &stats {
            Some(stats) => (stats.current_level, stats.activities.clone()),
            None => (1, Vec::new()),
        };
        let context = prompts::recommend_context(level, &activities, &facilities);

        let text = self
            .generator
            .complete(prompts::recommend_instruction(), Some(&context))
            .await;
        Ok(messages::recommendations(&text))
    }

    async fn handle_events(&self) -> Result<String> {
        let events = self.db.upcoming_events(Utc::now(), EVENTS_SHOWN).await?;
        if events.is_empty() {
            return Ok(messages::NO_EVENTS.to_string());
        }
        Ok(messages::event_list(&events))
    }

    async fn handle_free_text(&self, user_id: i64, text: &str) -> Result<String> {
        // Cost/noise control: very short messages never reach the
        // generation service.
        if text.chars().count() < self.min_query_chars {
            return Ok(messages::SHORT_QUERY_HINT.to_string());
        }

        let level = self
            .db
            .get_user(user_id)
            .await?
            .map_or(1, |user| user.current_level);
        let facilities = self.db.sample_facilities(CONTEXT_FACILITIES).await?;
        let events = self.db.upcoming_events(Utc::now(), CONTEXT_EVENTS).await?;

        let context = prompts::free_text_context(level, &facilities, &events);
        Ok(self.generator.complete(text, Some(&context)).await)
    }

    async fn user_lock(&self, user_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
