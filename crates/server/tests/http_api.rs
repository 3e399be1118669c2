//! HTTP API tests driven through the router with `oneshot`

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use ywait_config::Settings;
use ywait_server::{create_router, AppState};

fn app() -> (AppState, Router) {
    let mut settings = Settings::default();
    settings.dialogue.rng_seed = Some(11);
    let state = AppState::new(settings);
    let router = create_router(state.clone());
    (state, router)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_session_count() {
    let (_, router) = app();
    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn create_session_returns_personal_greeting() {
    let (_, router) = app();
    let (status, body) = send(
        &router,
        "POST",
        "/api/sessions",
        Some(json!({ "session_key": "u-1", "user_name": "Maya" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["session_key"], "u-1");
    assert_eq!(body["stage"], "greeting");
    assert!(body["text"]
        .as_str()
        .unwrap()
        .starts_with("Hello Maya! Welcome to Y-Wait Banking."));
    assert_eq!(body["options"].as_array().unwrap().len(), 5);

    let (_, messages) = send(&router, "GET", "/api/sessions/u-1/messages", None).await;
    assert_eq!(messages["messages"].as_array().unwrap().len(), 1);
    assert_eq!(messages["messages"][0]["sender"], "bot");
}

#[tokio::test]
async fn create_session_generates_key() {
    let (state, router) = app();
    let (status, body) = send(
        &router,
        "POST",
        "/api/sessions",
        Some(json!({ "user_name": "Lee" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let key = body["session_key"].as_str().unwrap();
    assert_eq!(key.len(), 36);
    assert!(state.sessions.get(key).is_some());
}

#[tokio::test]
async fn create_session_requires_name() {
    let (_, router) = app();
    let (status, body) = send(
        &router,
        "POST",
        "/api/sessions",
        Some(json!({ "user_name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn chat_walks_the_wait_time_flow() {
    let (_, router) = app();

    let (status, body) = send(
        &router,
        "POST",
        "/api/chat/walker",
        Some(json!({ "message": "Check wait times" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "waittime");

    let (_, body) = send(
        &router,
        "POST",
        "/api/chat/walker",
        Some(json!({ "message": "Westside Branch" })),
    )
    .await;
    assert_eq!(body["stage"], "completed");
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("30-45 minutes"));
    assert!(text.contains("busy"));

    let (_, snapshot) = send(&router, "GET", "/api/sessions/walker", None).await;
    assert_eq!(snapshot["stage"], "completed");
    assert_eq!(snapshot["slots"]["branch"], "Westside Branch");
    assert_eq!(snapshot["message_count"], 4);
}

#[tokio::test]
async fn chat_rejects_blank_message() {
    let (state, router) = app();
    let (status, body) = send(
        &router,
        "POST",
        "/api/chat/quiet",
        Some(json!({ "message": " \t " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "empty_input");
    assert_eq!(state.sessions.count(), 0);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let (_, router) = app();
    let (status, _) = send(&router, "GET", "/api/sessions/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "POST", "/api/sessions/ghost/reset", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_and_delete_session() {
    let (state, router) = app();
    send(
        &router,
        "POST",
        "/api/chat/r1",
        Some(json!({ "message": "Join virtual queue" })),
    )
    .await;

    let (status, body) = send(&router, "POST", "/api/sessions/r1/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "greeting");
    assert_eq!(body["slots"], json!({}));
    assert_eq!(body["message_count"], 2);

    let (status, _) = send(&router, "DELETE", "/api/sessions/r1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.sessions.get("r1").is_none());

    let (_, list) = send(&router, "GET", "/api/sessions", None).await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn branch_wait_table_is_served() {
    let (_, router) = app();
    let (status, body) = send(&router, "GET", "/api/branches/wait-times", None).await;
    assert_eq!(status, StatusCode::OK);

    let branches = body["branches"].as_array().unwrap();
    assert_eq!(branches.len(), 4);
    assert_eq!(branches[1]["branch"], "Westside Branch");
    assert_eq!(branches[1]["load"], "busy");
    assert!(branches[0].get("keyword").is_none());
    assert_eq!(body["active_queues"][0]["position"], 3);
}
