use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;
use tokio::time::interval;

use crate::classifier::{Category, Mood, RiskLevel};
use crate::mood::{average_rating, MoodDistribution, MoodRating};
use crate::session::{Session, SessionStore, Speaker};

pub const DEFAULT_IDLE_THRESHOLD_HOURS: u32 = 24;

/// Read-only summary of one session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub total_user_turns: usize,
    pub dominant_mood: Option<Mood>,
    pub risk_level: RiskLevel,
    pub distinct_categories_seen: Vec<Category>,
    pub consecutive_negative: u32,
    pub session_duration_ms: i64,
    pub mood_ratings_recorded: usize,
    pub average_mood_rating: Option<f64>,
    pub mood_distribution: MoodDistribution,
}

impl Insights {
    pub fn from_session(session: &Session, now: DateTime<Utc>) -> Self {
        let mut categories: Vec<Category> = Vec::new();
        let recorded = session
            .history()
            .iter()
            .filter(|turn| turn.speaker == Speaker::Bot)
            .filter_map(|turn| turn.category)
            .chain(session.last_category);
        for category in recorded {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }

        let ratings: Vec<MoodRating> = session.mood_ratings.iter().map(|(r, _)| *r).collect();
        let session_duration_ms = if session.history().is_empty() {
            0
        } else {
            (now - session.first_activity()).num_milliseconds().max(0)
        };

        Insights {
            total_user_turns: session.user_turn_count(),
            dominant_mood: session.mood,
            risk_level: session.risk_level,
            distinct_categories_seen: categories,
            consecutive_negative: session.consecutive_negative,
            session_duration_ms,
            mood_ratings_recorded: ratings.len(),
            average_mood_rating: average_rating(&ratings),
            mood_distribution: MoodDistribution::from_ratings(ratings.iter().copied()),
        }
    }
}

/// Summary for `user_id`, or `None` when no session exists
pub async fn get_insights(store: &dyn SessionStore, user_id: &str) -> Option<Insights> {
    let handle = store.get(user_id)?;
    let session = handle.lock().await;
    Some(Insights::from_session(&session, Utc::now()))
}

pub async fn sweep_idle_sessions(store: &dyn SessionStore, idle_threshold: Duration) -> usize {
    sweep_idle_sessions_at(store, idle_threshold, Utc::now()).await
}

/// Remove every session whose last turn is older than `now - idle_threshold`.
///
/// Each session is checked under its own lock, so a session that picked up a
/// turn after the snapshot was taken is left alone.
pub async fn sweep_idle_sessions_at(
    store: &dyn SessionStore,
    idle_threshold: Duration,
    now: DateTime<Utc>,
) -> usize {
    let Some(cutoff) = now.checked_sub_signed(idle_threshold) else {
        return 0;
    };

    let mut removed = 0;
    for (user_id, handle) in store.snapshot() {
        let mut session = handle.lock().await;
        if session.is_evicted() || session.last_activity() >= cutoff {
            continue;
        }

        session.mark_evicted();
        if store.remove(&user_id, &handle) {
            debug!("🧹 Evicted idle session for user {}", user_id);
            removed += 1;
        }
    }

    removed
}

/// Background task that runs the idle sweep on a fixed period
pub struct SessionSweeper {
    store: Arc<dyn SessionStore>,
    idle_threshold: Duration,
    period: std::time::Duration,
}

impl SessionSweeper {
    pub fn new(store: Arc<dyn SessionStore>, idle_threshold: Duration, period: std::time::Duration) -> Self {
        Self {
            store,
            idle_threshold,
            period,
        }
    }

    /// Sweep forever. Spawn this as a tokio task.
    pub async fn run(&self) {
        let mut ticker = interval(self.period);

        info!(
            "🧹 Session sweeper started (every {:?}, idle after {}h)",
            self.period,
            self.idle_threshold.num_hours()
        );

        loop {
            ticker.tick().await;
            self.sweep_once().await;
        }
    }

    pub async fn sweep_once(&self) -> usize {
        let removed = sweep_idle_sessions(self.store.as_ref(), self.idle_threshold).await;
        if removed > 0 {
            info!("🧹 Removed {} idle session(s), {} remaining", removed, self.store.len());
        } else {
            debug!("🧹 No idle sessions to remove");
        }
        removed
    }
}
