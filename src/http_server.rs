use anyhow::{anyhow, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::engine::WellnessEngine;
use crate::mood::MoodRating;
use crate::rate_limiter::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub engine: WellnessEngine,
    pub limiter: Arc<RateLimiter>,
}

type ApiError = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodPayload {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub mood_rating: Option<i64>,
    pub notes: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/chat/message", post(handle_message))
        .route("/api/chat/mood", post(handle_mood_rating))
        .route("/api/chat/insights/:user_id", get(handle_insights))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Wellness chat engine is running",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message })))
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

fn enforce_rate_limit(state: &AppState, user_id: &str) -> Result<(), ApiError> {
    if state.limiter.check_rate_limit(user_id) {
        Ok(())
    } else {
        warn!("Rate limit exceeded for user: {}", user_id);
        Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "message": "You're sending messages too quickly! Please slow down." })),
        ))
    }
}

async fn handle_message(
    State(state): State<AppState>,
    Json(payload): Json<MessagePayload>,
) -> Result<Json<Value>, ApiError> {
    let request_id = uuid::Uuid::new_v4();

    let (Some(user_id), Some(session_id), Some(message)) = (
        non_empty(payload.user_id),
        non_empty(payload.session_id),
        non_empty(payload.message),
    ) else {
        return Err(bad_request("Message, userId, and sessionId are required"));
    };

    enforce_rate_limit(&state, &user_id)?;

    info!("[{}] 📥 Message from user {} ({} chars)", request_id, user_id, message.len());
    let response = state.engine.process_turn(&user_id, &session_id, &message).await;
    info!(
        "[{}] 📤 Replied to user {} with {} character message",
        request_id,
        user_id,
        response.message.len()
    );

    Ok(Json(json!({
        "userMessage": message,
        "botResponse": {
            "text": response.message,
            "resources": response.resources,
            "moodCheck": response.mood_check,
        },
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

async fn handle_mood_rating(
    State(state): State<AppState>,
    Json(payload): Json<MoodPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (Some(user_id), Some(session_id), Some(raw_rating)) = (
        non_empty(payload.user_id),
        non_empty(payload.session_id),
        payload.mood_rating,
    ) else {
        return Err(bad_request("Session ID, User ID, and mood rating are required"));
    };

    let rating = MoodRating::new(raw_rating).map_err(|e| {
        warn!("Rejected mood rating from user {}: {}", user_id, e);
        bad_request("Mood rating must be between 1 and 10")
    })?;

    enforce_rate_limit(&state, &user_id)?;

    let acknowledgment = state.engine.record_mood_rating(&user_id, rating).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Mood rating saved successfully",
            "moodEntry": {
                "sessionId": session_id,
                "userId": user_id,
                "moodRating": rating,
                "notes": payload.notes.unwrap_or_default(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            },
            "followUp": acknowledgment
        })),
    ))
}

async fn handle_insights(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.engine.insights(&user_id).await {
        Some(insights) => Ok(Json(json!({ "userId": user_id, "insights": insights }))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "No active conversation for this user" })),
        )),
    }
}

pub async fn start_http_server(config: &Config, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", config.port))
        .await
        .map_err(|e| anyhow!("Failed to bind to port {}: {}", config.port, e))?;

    info!("HTTP server starting on port {}", config.port);
    info!("Chat endpoint: http://0.0.0.0:{}/api/chat/message", config.port);

    axum::serve(listener, app).await.map_err(|e| {
        error!("❌ HTTP server error: {}", e);
        anyhow!("HTTP server error: {}", e)
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::ResponseGenerator;
    use crate::session::InMemorySessionStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state(max_requests: usize) -> AppState {
        AppState {
            engine: WellnessEngine::with_parts(
                Arc::new(InMemorySessionStore::new()),
                ResponseGenerator::seeded(1),
            ),
            limiter: Arc::new(RateLimiter::new(max_requests, Duration::from_secs(60))),
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(test_state(10));
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["status"], "OK");
    }

    #[tokio::test]
    async fn test_message_round_trip() {
        let app = create_router(test_state(10));
        let response = app
            .oneshot(post_json(
                "/api/chat/message",
                json!({ "userId": "u1", "sessionId": "s1", "message": "hi" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["userMessage"], "hi");
        assert!(body["botResponse"]["text"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body["botResponse"]["resources"].is_null());
        assert!(body["botResponse"]["moodCheck"].is_null());
    }

    #[tokio::test]
    async fn test_crisis_message_carries_resources() {
        let app = create_router(test_state(10));
        let response = app
            .oneshot(post_json(
                "/api/chat/message",
                json!({ "userId": "u1", "sessionId": "s1", "message": "I want to die" }),
            ))
            .await
            .unwrap();

        let body = read_json(response).await;
        assert_eq!(body["botResponse"]["resources"]["title"], "Immediate Crisis Support");
        assert_eq!(body["botResponse"]["moodCheck"]["scale"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_message_requires_fields() {
        let app = create_router(test_state(10));
        let response = app
            .oneshot(post_json("/api/chat/message", json!({ "userId": "u1", "message": "hi" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_out_of_range_mood_rating_is_rejected() {
        let state = test_state(10);
        let app = create_router(state.clone());

        let response = app
            .oneshot(post_json(
                "/api/chat/mood",
                json!({ "userId": "u1", "sessionId": "s1", "moodRating": 11 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["message"], "Mood rating must be between 1 and 10");
    }

    #[tokio::test]
    async fn test_valid_mood_rating() {
        let state = test_state(10);
        state.engine.process_turn("u1", "s1", "hello").await;
        let app = create_router(state.clone());

        let response = app
            .oneshot(post_json(
                "/api/chat/mood",
                json!({ "userId": "u1", "sessionId": "s1", "moodRating": 8, "notes": "good day" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["moodEntry"]["moodRating"], 8);
        assert!(body["followUp"].as_str().unwrap().contains("8/10"));
        assert_eq!(state.engine.insights("u1").await.unwrap().mood_ratings_recorded, 1);
    }

    #[tokio::test]
    async fn test_insights_endpoint() {
        let state = test_state(10);
        let app = create_router(state.clone());

        let missing = app
            .clone()
            .oneshot(Request::builder().uri("/api/chat/insights/u1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        state.engine.process_turn("u1", "s1", "I'm so stressed").await;
        let found = app
            .oneshot(Request::builder().uri("/api/chat/insights/u1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(found.status(), StatusCode::OK);
        let body = read_json(found).await;
        assert_eq!(body["insights"]["totalUserTurns"], 1);
        assert_eq!(body["insights"]["dominantMood"], "stressed");
    }

    #[tokio::test]
    async fn test_rate_limited_user() {
        let app = create_router(test_state(1));
        let payload = json!({ "userId": "u1", "sessionId": "s1", "message": "hi" });

        let first = app.clone().oneshot(post_json("/api/chat/message", payload.clone())).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.oneshot(post_json("/api/chat/message", payload)).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
