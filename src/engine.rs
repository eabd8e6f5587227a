use chrono::{Duration, Utc};
use log::{debug, info, warn};
use std::sync::Arc;

use crate::classifier::{Category, MessageClassifier};
use crate::lifecycle::{self, Insights};
use crate::mood::MoodRating;
use crate::responder::{BotResponse, ResponseGenerator};
use crate::session::{InMemorySessionStore, SessionStore, Turn};

/// Classifies each turn, updates the user's session and produces the reply
#[derive(Clone)]
pub struct WellnessEngine {
    classifier: MessageClassifier,
    generator: Arc<ResponseGenerator>,
    store: Arc<dyn SessionStore>,
}

impl WellnessEngine {
    pub fn new() -> Self {
        Self::with_parts(
            Arc::new(InMemorySessionStore::new()),
            ResponseGenerator::new(),
        )
    }

    pub fn with_parts(store: Arc<dyn SessionStore>, generator: ResponseGenerator) -> Self {
        WellnessEngine {
            classifier: MessageClassifier::new(),
            generator: Arc::new(generator),
            store,
        }
    }

    pub fn store(&self) -> Arc<dyn SessionStore> {
        self.store.clone()
    }

    /// Handle one user message end to end.
    ///
    /// The whole classify, update, generate, record sequence runs while holding
    /// the session lock, so two messages from the same user never interleave.
    /// `session_id` is kept for correlation only; sessions are keyed by user.
    pub async fn process_turn(&self, user_id: &str, session_id: &str, text: &str) -> BotResponse {
        loop {
            let handle = self.store.get_or_create(user_id);
            let mut session = handle.lock().await;
            if session.is_evicted() {
                // swept between lookup and lock
                continue;
            }

            if session.session_id.is_none() {
                session.session_id = Some(session_id.to_string());
            }
            session.push_turn(Turn::user(text, Utc::now()));

            let analysis = self.classifier.classify(text);
            session.apply_analysis(&analysis);

            if analysis.category == Category::Crisis {
                warn!("🚨 Crisis language detected for user {}", user_id);
            }
            debug!(
                "Classified message from user {} as {} (risk {:?}, streak {})",
                user_id,
                analysis.category.as_str(),
                analysis.risk_level,
                session.consecutive_negative
            );

            let response = self.generator.generate(&analysis, &session);
            session.push_turn(Turn::bot(response.message.clone(), analysis.category, Utc::now()));

            return response;
        }
    }

    /// Accept a rating from the mood-check channel and return the acknowledgment.
    ///
    /// The rating is attached to the user's live session if there is one.
    pub async fn record_mood_rating(&self, user_id: &str, rating: MoodRating) -> String {
        if let Some(handle) = self.store.get(user_id) {
            let mut session = handle.lock().await;
            if !session.is_evicted() {
                session.record_mood_rating(rating, Utc::now());
            }
        }
        info!("Mood rating {} recorded for user {}", rating, user_id);
        rating.acknowledgment()
    }

    pub async fn insights(&self, user_id: &str) -> Option<Insights> {
        lifecycle::get_insights(self.store.as_ref(), user_id).await
    }

    pub async fn sweep_idle_sessions(&self, idle_threshold: Duration) -> usize {
        lifecycle::sweep_idle_sessions(self.store.as_ref(), idle_threshold).await
    }
}

impl Default for WellnessEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::RiskLevel;
    use crate::lexicon::{CRISIS_RESOURCES, PROFESSIONAL_RESOURCES, WELLNESS_RESOURCES};
    use crate::session::{Session, Speaker};

    fn engine() -> WellnessEngine {
        WellnessEngine::with_parts(Arc::new(InMemorySessionStore::new()), ResponseGenerator::seeded(17))
    }

    #[tokio::test]
    async fn test_each_turn_appends_two_entries() {
        let engine = engine();

        for (i, text) in ["hi", "I'm worried", "thanks"].iter().enumerate() {
            engine.process_turn("user1", "session-a", text).await;
            let handle = engine.store().get("user1").unwrap();
            let session = handle.lock().await;
            assert_eq!(session.history().len(), (i + 1) * 2);
            assert_eq!(session.history()[i * 2].speaker, Speaker::User);
            assert_eq!(session.history()[i * 2 + 1].speaker, Speaker::Bot);
        }
    }

    #[tokio::test]
    async fn test_bot_turn_records_reply_and_category() {
        let engine = engine();
        let response = engine.process_turn("user1", "session-a", "so overwhelmed").await;

        let handle = engine.store().get("user1").unwrap();
        let session = handle.lock().await;
        let bot_turn = session.history().last().unwrap();
        assert_eq!(bot_turn.text, response.message);
        assert_eq!(bot_turn.category, Some(Category::Stress));
        assert_eq!(session.session_id.as_deref(), Some("session-a"));
    }

    #[tokio::test]
    async fn test_presentation_anxiety_scenario() {
        let engine = engine();
        let response = engine
            .process_turn("user1", "s1", "I'm feeling really anxious about my presentation")
            .await;

        assert!(response.resources.is_none());
        assert!(response.mood_check.is_some());
        let insights = engine.insights("user1").await.unwrap();
        assert_eq!(insights.risk_level, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_third_anxiety_turn_gets_professional_bundle() {
        let engine = engine();
        let first = engine.process_turn("user1", "s1", "I'm anxious").await;
        let second = engine.process_turn("user1", "s1", "still so nervous").await;
        let third = engine.process_turn("user1", "s1", "the panic keeps coming").await;

        assert_eq!(first.resources, None);
        // two negative turns trigger the wellness safety net
        assert_eq!(second.resources, Some(WELLNESS_RESOURCES));
        assert_eq!(third.resources, Some(PROFESSIONAL_RESOURCES));
    }

    #[tokio::test]
    async fn test_depression_streak_scenario() {
        let engine = engine();
        engine.process_turn("user1", "s1", "so stressed").await;
        engine.process_turn("user1", "s1", "I'm worried").await;
        engine.process_turn("user1", "s1", "totally exhausted").await;
        let response = engine.process_turn("user1", "s1", "I feel hopeless").await;

        assert_eq!(response.resources, Some(PROFESSIONAL_RESOURCES));
        assert_eq!(engine.insights("user1").await.unwrap().consecutive_negative, 4);
    }

    #[tokio::test]
    async fn test_greeting_on_fresh_session() {
        let engine = engine();
        let response = engine.process_turn("user1", "s1", "hi").await;
        assert!(response.resources.is_none());
        assert!(response.mood_check.is_none());
    }

    #[tokio::test]
    async fn test_crisis_overrides_streak_bundle() {
        let engine = engine();
        engine.process_turn("user1", "s1", "so stressed").await;
        let response = engine.process_turn("user1", "s1", "I want to end it all").await;
        assert_eq!(response.resources, Some(CRISIS_RESOURCES));
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let engine = engine();
        engine.process_turn("user1", "s1", "I'm sad").await;
        engine.process_turn("user1", "s1", "I'm sad").await;
        engine.process_turn("user2", "s2", "I'm sad").await;

        assert_eq!(engine.insights("user1").await.unwrap().consecutive_negative, 2);
        assert_eq!(engine.insights("user2").await.unwrap().consecutive_negative, 1);
    }

    #[tokio::test]
    async fn test_concurrent_turns_for_one_user_stay_consistent() {
        let engine = engine();
        let mut tasks = Vec::new();
        for _ in 0..20 {
            let engine = engine.clone();
            tasks.push(tokio::spawn(async move {
                engine.process_turn("user1", "s1", "I'm worried").await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let handle = engine.store().get("user1").unwrap();
        let session = handle.lock().await;
        assert_eq!(session.history().len(), 40);
        assert_eq!(session.consecutive_negative, 20);
        for pair in session.history().chunks(2) {
            assert_eq!(pair[0].speaker, Speaker::User);
            assert_eq!(pair[1].speaker, Speaker::Bot);
        }
    }

    #[tokio::test]
    async fn test_mood_rating_is_recorded() {
        let engine = engine();
        engine.process_turn("user1", "s1", "hello").await;

        let ack = engine.record_mood_rating("user1", MoodRating::new(2).unwrap()).await;
        assert!(ack.contains("2/10"));

        let insights = engine.insights("user1").await.unwrap();
        assert_eq!(insights.mood_ratings_recorded, 1);
        // ratings are a side channel and do not touch the history
        assert_eq!(insights.total_user_turns, 1);
    }

    #[tokio::test]
    async fn test_mood_rating_without_session() {
        let engine = engine();
        let ack = engine.record_mood_rating("ghost", MoodRating::new(9).unwrap()).await;
        assert!(ack.contains("9/10"));
        assert!(engine.insights("ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_turn_queued_behind_sweep_starts_fresh_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let engine = WellnessEngine::with_parts(store.clone(), ResponseGenerator::seeded(17));

        let stale_at = Utc::now() - Duration::hours(48);
        let mut stale = Session::starting_at("user1", stale_at);
        stale.push_turn(Turn::user("hello", stale_at));
        stale.push_turn(Turn::bot("Hi there!", Category::Greeting, stale_at));
        let stale_handle = store.insert(stale);

        // hold the session so both tasks queue on its lock, sweep first
        let guard = stale_handle.lock().await;

        let sweep_store = store.clone();
        let sweep = tokio::spawn(async move {
            lifecycle::sweep_idle_sessions_at(sweep_store.as_ref(), Duration::hours(24), Utc::now()).await
        });
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        let turn_engine = engine.clone();
        let turn = tokio::spawn(async move { turn_engine.process_turn("user1", "s2", "hi").await });
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        drop(guard);
        assert_eq!(sweep.await.unwrap(), 1);
        turn.await.unwrap();

        assert!(stale_handle.lock().await.is_evicted());
        assert_eq!(stale_handle.lock().await.history().len(), 2);

        let fresh = store.get("user1").unwrap();
        assert!(!Arc::ptr_eq(&stale_handle, &fresh));
        let session = fresh.lock().await;
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.session_id.as_deref(), Some("s2"));
    }

    #[tokio::test]
    async fn test_sweep_through_engine() {
        let engine = engine();
        engine.process_turn("user1", "s1", "hi").await;

        assert_eq!(engine.sweep_idle_sessions(Duration::hours(24)).await, 0);
        assert_eq!(engine.sweep_idle_sessions(Duration::zero() - Duration::seconds(1)).await, 1);
        assert!(engine.insights("user1").await.is_none());

        // next message starts over
        engine.process_turn("user1", "s2", "hi").await;
        let insights = engine.insights("user1").await.unwrap();
        assert_eq!(insights.total_user_turns, 1);
    }
}
