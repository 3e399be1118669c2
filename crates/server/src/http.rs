//! HTTP Endpoints
//!
//! REST API over the session store. Every handler is a thin adapter: parse,
//! call the session manager, serialize.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use ywait_agent::SessionSnapshot;
use ywait_config::constants::server::DEFAULT_CORS_ORIGIN;
use ywait_config::domain::{ActiveQueue, BranchWaitTime, ACTIVE_QUEUES, BRANCH_WAIT_TIMES};
use ywait_core::{DialogueStage, Message};

use crate::metrics::{metrics_handler, record_request, record_turn};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let (cors_layer, timeout) = {
        let config = state.get_config();
        (
            build_cors_layer(&config.server.cors_origins, config.server.cors_enabled),
            Duration::from_secs(config.server.timeout_seconds),
        )
    };

    Router::new()
        // Sessions
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:key", get(get_session).delete(delete_session))
        .route("/api/sessions/:key/reset", post(reset_session))
        .route("/api/sessions/:key/messages", get(get_messages))
        // Conversation
        .route("/api/chat/:key", post(chat))
        // Dashboard data
        .route("/api/branches/wait-times", get(branch_wait_times))
        // Health
        .route("/health", get(health_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        // Admin
        .route("/admin/reload-config", post(reload_config))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to {}", DEFAULT_CORS_ORIGIN);
        return CorsLayer::new()
            .allow_origin(HeaderValue::from_static(DEFAULT_CORS_ORIGIN))
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Create session request
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Session key; a UUID is generated when absent
    #[serde(default)]
    pub session_key: Option<String>,
    pub user_name: String,
}

/// Bot reply as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub session_key: String,
    pub text: String,
    pub options: Vec<String>,
    pub stage: DialogueStage,
}

/// Create (or reopen) a session and return its greeting
async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ReplyResponse>), ServerError> {
    record_request("create_session");

    let user_name = request.user_name.trim();
    if user_name.is_empty() {
        return Err(ServerError::InvalidRequest("user_name must not be empty".into()));
    }

    let key = request
        .session_key
        .filter(|k| !k.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let brand = state.assistant_brand();
    let reply = state.sessions.create_session(&key, user_name, &brand)?;
    let stage = state.sessions.snapshot(&key)?.stage;

    Ok((
        StatusCode::CREATED,
        Json(ReplyResponse {
            session_key: key,
            text: reply.text,
            options: reply.options,
            stage,
        }),
    ))
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    record_request("list_sessions");
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Get session snapshot
async fn get_session(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SessionSnapshot>, ServerError> {
    record_request("get_session");
    Ok(Json(state.sessions.snapshot(&key)?))
}

/// Destroy session (logout)
async fn delete_session(State(state): State<AppState>, Path(key): Path<String>) -> StatusCode {
    record_request("delete_session");
    state.sessions.destroy_session(&key);
    StatusCode::NO_CONTENT
}

/// Reset stage and slots, keeping the log
async fn reset_session(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SessionSnapshot>, ServerError> {
    record_request("reset_session");
    state.sessions.reset(&key)?;
    Ok(Json(state.sessions.snapshot(&key)?))
}

/// Messages response
#[derive(Debug, Serialize)]
struct MessagesResponse {
    session_key: String,
    messages: Vec<Message>,
}

/// Full message log for rendering
async fn get_messages(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MessagesResponse>, ServerError> {
    record_request("get_messages");
    let messages = state.sessions.messages(&key)?;
    Ok(Json(MessagesResponse {
        session_key: key,
        messages,
    }))
}

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Chat endpoint
async fn chat(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ReplyResponse>, ServerError> {
    record_request("chat");

    let (reply, stage) = state.sessions.submit(&key, &request.message)?;
    record_turn(stage.as_str());

    Ok(Json(ReplyResponse {
        session_key: key,
        text: reply.text,
        options: reply.options,
        stage,
    }))
}

/// Branch table response
#[derive(Debug, Serialize)]
struct BranchWaitTimesResponse {
    branches: &'static [BranchWaitTime],
    active_queues: &'static [ActiveQueue],
}

/// Fixed branch wait/status table for the dashboard widget
async fn branch_wait_times() -> Json<BranchWaitTimesResponse> {
    record_request("branch_wait_times");
    Json(BranchWaitTimesResponse {
        branches: &BRANCH_WAIT_TIMES,
        active_queues: &ACTIVE_QUEUES,
    })
}

/// Liveness check
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let environment = state.get_config().environment;
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": environment,
        "active_sessions": state.sessions.count(),
    }))
}

/// Config reload endpoint
///
/// POST /admin/reload-config
async fn reload_config(State(state): State<AppState>) -> impl IntoResponse {
    record_request("reload_config");
    match state.reload_config() {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "message": "Configuration reloaded successfully"
            })),
        ),
        Err(e) => {
            tracing::error!("Config reload failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "status": "error",
                    "message": e.to_string()
                })),
            )
        },
    }
}
