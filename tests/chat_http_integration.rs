//! Integration tests for the chat relay HTTP endpoint.
//!
//! These tests exercise the full router against a scripted provider:
//! 1. Request/response bodies follow the wire contract
//! 2. Thread tokens round-trip across turns
//! 3. Provider failures map to the documented error responses

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use garden_sage::adapters::ai::MockAssistantProvider;
use garden_sage::adapters::http::chat::{chat_router, ChatAppState};
use garden_sage::adapters::relay::InProcessRelay;
use garden_sage::application::client::{ConversationClient, SendOutcome};
use garden_sage::application::relay::SubmitTurnHandler;
use garden_sage::domain::conversation::{Role, ThreadId};
use garden_sage::ports::RunStatus;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn handler(provider: MockAssistantProvider) -> SubmitTurnHandler {
    SubmitTurnHandler::new(Arc::new(provider), "asst_garden")
        .with_poll_interval(Duration::from_millis(1))
}

fn app(handler: SubmitTurnHandler) -> Router {
    chat_router().with_state(ChatAppState::new(Arc::new(handler)))
}

async fn post_chat(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// POST /api/chat
// =============================================================================

#[tokio::test]
async fn first_turn_creates_thread_and_returns_reply() {
    let provider = MockAssistantProvider::new()
        .with_run_statuses([RunStatus::Queued, RunStatus::InProgress, RunStatus::Completed])
        .with_assistant_reply("Loamy, well-draining soil rich in organic matter.");
    let calls = provider.calls();
    let app = app(handler(provider));

    let (status, body) =
        post_chat(&app, json!({ "message": "What soil is best for tomatoes?" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["reply"],
        "Loamy, well-draining soil rich in organic matter."
    );
    assert_eq!(body["threadId"], "thread_mock_1");
    assert_eq!(calls.lock().unwrap()[0], "create_thread");
}

#[tokio::test]
async fn second_turn_reuses_thread_token() {
    let provider = MockAssistantProvider::new()
        .with_run_statuses([RunStatus::Completed])
        .with_assistant_reply("Water deeply, twice a week.");
    let calls = provider.calls();
    let app = app(handler(provider));

    let (status, body) = post_chat(
        &app,
        json!({ "message": "How often should I water?", "threadId": "t_123" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["threadId"], "t_123");
    let calls = calls.lock().unwrap();
    assert!(!calls.iter().any(|c| c == "create_thread"));
    assert!(calls
        .iter()
        .any(|c| c.starts_with("add_user_message:t_123")));
}

#[tokio::test]
async fn empty_message_is_rejected_before_any_provider_call() {
    let provider = MockAssistantProvider::new();
    let calls = provider.calls();
    let app = app(handler(provider));

    let (status, body) = post_chat(&app, json!({ "message": "   " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_message_is_rejected() {
    let provider = MockAssistantProvider::new();
    let app = app(handler(provider));

    let (status, body) = post_chat(&app, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn failed_run_returns_500_with_terminal_status() {
    let provider = MockAssistantProvider::new().with_run_statuses([RunStatus::Failed]);
    let app = app(handler(provider));

    let (status, body) = post_chat(&app, json!({ "message": "hello" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Assistant run did not complete successfully");
    assert_eq!(body["details"], "failed");
}

#[tokio::test]
async fn stuck_run_times_out_distinctly() {
    let provider = MockAssistantProvider::new().with_run_statuses([
        RunStatus::InProgress,
        RunStatus::InProgress,
        RunStatus::InProgress,
        RunStatus::InProgress,
    ]);
    let app = app(handler(provider).with_max_poll_attempts(3));

    let (status, body) = post_chat(&app, json!({ "message": "hello" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["details"], "timeout");
}

#[tokio::test]
async fn completed_run_without_reply_returns_500() {
    let provider = MockAssistantProvider::new().with_run_statuses([RunStatus::Completed]);
    let app = app(handler(provider));

    let (status, body) = post_chat(&app, json!({ "message": "hello" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "No text response from assistant");
}

#[tokio::test]
async fn health_probe_returns_ok() {
    let provider = MockAssistantProvider::new();
    let app = app(handler(provider));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Client against the full relay stack
// =============================================================================

#[tokio::test]
async fn client_conversation_over_in_process_relay() {
    let provider = MockAssistantProvider::new()
        .with_run_statuses([RunStatus::Completed, RunStatus::Completed])
        .with_assistant_reply("Loamy, slightly acidic soil.");
    let relay = InProcessRelay::new(Arc::new(handler(provider)));
    let client = ConversationClient::new(Arc::new(relay));

    let outcome = client.send("What soil is best for tomatoes?").await;
    assert_eq!(outcome, SendOutcome::Replied);

    let transcript = client.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role(), Role::User);
    assert_eq!(transcript[1].content(), "Loamy, slightly acidic soil.");
    assert_eq!(
        client.thread_id().await,
        Some(ThreadId::new("thread_mock_1"))
    );

    // A second turn continues the same thread.
    let outcome = client.send("And how much sun?").await;
    assert_eq!(outcome, SendOutcome::Replied);
    assert_eq!(
        client.thread_id().await,
        Some(ThreadId::new("thread_mock_1"))
    );
}

#[tokio::test]
async fn client_surfaces_relay_failure_as_error_turn() {
    let provider = MockAssistantProvider::new().with_run_statuses([RunStatus::Expired]);
    let relay = InProcessRelay::new(Arc::new(handler(provider)));
    let client = ConversationClient::new(Arc::new(relay));

    let outcome = client.send("hello").await;

    assert_eq!(outcome, SendOutcome::Failed);
    let transcript = client.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert!(transcript[1]
        .content()
        .starts_with("Sorry, I encountered an error."));
    assert_eq!(client.thread_id().await, None);
}
