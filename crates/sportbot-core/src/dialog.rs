//! Per-user guided-search dialog state.
//!
//! Sessions live in process memory behind a keyed store so the business
//! logic never touches the transport. The store holds one session per
//! user, evicts sessions idle past a bounded TTL, and never formats text
//! or talks to the database; the router drives every transition.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::models::Facility;

/// Where a user currently is in the guided facility search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Idle,
    AwaitingSportType,
    AwaitingAgeGroup,
}

#[derive(Debug, Clone)]
struct DialogSession {
    state: DialogState,
    /// Sport-type selection accumulated on the first dialog step.
    sport_type: Option<String>,
    /// Most recent materialized search results, kept for by-index
    /// resolution of a later `visit N` command.
    results: Vec<Facility>,
    touched_at: Instant,
}

impl DialogSession {
    fn new() -> Self {
        Self {
            state: DialogState::Idle,
            sport_type: None,
            results: Vec::new(),
            touched_at: Instant::now(),
        }
    }
}

/// In-memory session store keyed by user id.
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, DialogSession>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Current dialog state; an absent or expired session reads as idle.
    pub async fn state(&self, user_id: i64) -> DialogState {
        let mut sessions = self.sessions.lock().await;
        match live_entry(&mut sessions, user_id, self.idle_ttl) {
            Some(session) => session.state,
            None => DialogState::Idle,
        }
    }

    /// Enter the guided search flow.
    pub async fn begin_search(&self, user_id: i64) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(user_id).or_insert_with(DialogSession::new);
        session.state = DialogState::AwaitingSportType;
        session.sport_type = None;
        session.touched_at = Instant::now();
    }

    /// Accept the sport-type reply verbatim and advance to the age step.
    pub async fn select_sport(&self, user_id: i64, sport: &str) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(user_id).or_insert_with(DialogSession::new);
        session.state = DialogState::AwaitingAgeGroup;
        session.sport_type = Some(sport.to_string());
        session.touched_at = Instant::now();
    }

    /// Consume the in-flight flow on the final dialog step, returning the
    /// stored sport-type selection. The state returns to idle either way.
    pub async fn take_pending_sport(&self, user_id: i64) -> Option<String> {
        let mut sessions = self.sessions.lock().await;
        let session = live_entry(&mut sessions, user_id, self.idle_ttl)?;
        session.state = DialogState::Idle;
        session.touched_at = Instant::now();
        session.sport_type.take()
    }

    /// Attach a completed search's result set for later `visit N` lookup.
    pub async fn attach_results(&self, user_id: i64, results: Vec<Facility>) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(user_id).or_insert_with(DialogSession::new);
        session.results = results;
        session.touched_at = Instant::now();
    }

    /// Resolve a 1-based index against the attached result set.
    pub async fn result_at(&self, user_id: i64, index: usize) -> Option<Facility> {
        let mut sessions = self.sessions.lock().await;
        let session = live_entry(&mut sessions, user_id, self.idle_ttl)?;
        session.touched_at = Instant::now();
        if index == 0 {
            return None;
        }
        session.results.get(index - 1).cloned()
    }

    /// Abort an in-progress flow. Previously attached results survive so a
    /// completed search stays referenceable after an unrelated command.
    pub async fn cancel_flow(&self, user_id: i64) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&user_id) {
            session.state = DialogState::Idle;
            session.sport_type = None;
            session.touched_at = Instant::now();
        }
    }

    /// Drop the session entirely, attached results included.
    pub async fn clear(&self, user_id: i64) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(&user_id);
    }
}

/// Fetch a user's session, evicting it first if idle past the TTL.
fn live_entry(
    sessions: &mut HashMap<i64, DialogSession>,
    user_id: i64,
    idle_ttl: Duration,
) -> Option<&mut DialogSession> {
    let expired = sessions
        .get(&user_id)
        .is_some_and(|session| session.touched_at.elapsed() > idle_ttl);
    if expired {
        sessions.remove(&user_id);
    }
    sessions.get_mut(&user_id)
}

#[cfg(test)]
#[path = "dialog_tests.rs"]
mod tests;
