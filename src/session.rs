use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::classifier::{Analysis, Category, Mood, RiskLevel};
use crate::mood::MoodRating;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Bot,
}

/// One entry in a conversation. Only bot turns carry a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Turn {
    pub fn user(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Turn {
            speaker: Speaker::User,
            text: text.into(),
            timestamp,
            category: None,
        }
    }

    pub fn bot(text: impl Into<String>, category: Category, timestamp: DateTime<Utc>) -> Self {
        Turn {
            speaker: Speaker::Bot,
            text: text.into(),
            timestamp,
            category: Some(category),
        }
    }
}

/// Per-user conversational state
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    /// Correlation id from the first turn, for the external persistence layer
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    history: Vec<Turn>,
    pub mood: Option<Mood>,
    pub risk_level: RiskLevel,
    pub last_category: Option<Category>,
    pub consecutive_negative: u32,
    pub mood_ratings: Vec<(MoodRating, DateTime<Utc>)>,
    evicted: bool,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::starting_at(user_id, Utc::now())
    }

    pub fn starting_at(user_id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Session {
            user_id: user_id.into(),
            session_id: None,
            created_at,
            history: Vec::new(),
            mood: None,
            risk_level: RiskLevel::Low,
            last_category: None,
            consecutive_negative: 0,
            mood_ratings: Vec::new(),
            evicted: false,
        }
    }

    /// Append-only view of the conversation
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.history.push(turn);
    }

    /// Fold a fresh analysis into the session.
    ///
    /// Mood, risk and category are overwritten. Any negative category (crisis
    /// included) extends the streak by one; anything else resets it.
    pub fn apply_analysis(&mut self, analysis: &Analysis) -> &mut Self {
        self.mood = Some(analysis.mood);
        self.risk_level = analysis.risk_level;
        self.last_category = Some(analysis.category);

        if analysis.category.is_negative() {
            self.consecutive_negative += 1;
        } else {
            self.consecutive_negative = 0;
        }
        self
    }

    /// Categories of the most recent bot turns, newest first
    pub fn recent_bot_categories(&self, count: usize) -> impl Iterator<Item = Option<Category>> + '_ {
        self.history
            .iter()
            .rev()
            .filter(|turn| turn.speaker == Speaker::Bot)
            .take(count)
            .map(|turn| turn.category)
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.history
            .last()
            .map(|turn| turn.timestamp)
            .unwrap_or(self.created_at)
    }

    pub fn first_activity(&self) -> DateTime<Utc> {
        self.history
            .first()
            .map(|turn| turn.timestamp)
            .unwrap_or(self.created_at)
    }

    pub fn user_turn_count(&self) -> usize {
        self.history
            .iter()
            .filter(|turn| turn.speaker == Speaker::User)
            .count()
    }

    pub fn record_mood_rating(&mut self, rating: MoodRating, at: DateTime<Utc>) {
        self.mood_ratings.push((rating, at));
    }

    /// Set by the idle sweep just before the session leaves the store.
    /// Anyone still holding the handle must fetch a fresh session.
    pub fn is_evicted(&self) -> bool {
        self.evicted
    }

    pub(crate) fn mark_evicted(&mut self) {
        self.evicted = true;
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Owner of all live sessions, keyed by user id.
///
/// Handles are shared; callers serialize work on one session by holding its lock.
pub trait SessionStore: Send + Sync {
    /// Existing session for the user, or a fresh empty one
    fn get_or_create(&self, user_id: &str) -> SessionHandle;

    fn get(&self, user_id: &str) -> Option<SessionHandle>;

    /// Remove the user's entry only if it is still `handle`
    fn remove(&self, user_id: &str, handle: &SessionHandle) -> bool;

    /// Point-in-time copy of every (user id, handle) pair
    fn snapshot(&self) -> Vec<(String, SessionHandle)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store. Cross-user access never contends beyond a DashMap shard.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionHandle>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        InMemorySessionStore {
            sessions: DashMap::new(),
        }
    }

    /// Insert a prepared session, replacing any existing one for the same user
    pub fn insert(&self, session: Session) -> SessionHandle {
        let user_id = session.user_id.clone();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(user_id, handle.clone());
        handle
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, user_id: &str) -> SessionHandle {
        self.sessions
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Session::new(user_id))))
            .clone()
    }

    fn get(&self, user_id: &str) -> Option<SessionHandle> {
        self.sessions.get(user_id).map(|entry| entry.clone())
    }

    fn remove(&self, user_id: &str, handle: &SessionHandle) -> bool {
        self.sessions
            .remove_if(user_id, |_, current| Arc::ptr_eq(current, handle))
            .is_some()
    }

    fn snapshot(&self) -> Vec<(String, SessionHandle)> {
        self.sessions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}
