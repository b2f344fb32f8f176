//! HTTP handlers for the chat endpoint.
//!
//! Connects the Axum route to the relay's SubmitTurn handler and maps the
//! relay error taxonomy onto the wire contract: 400 for invalid input, 500
//! (with diagnostic details) for provider-side failures.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::relay::{RelayError, SubmitTurnHandler};
use crate::domain::conversation::ThreadId;

use super::dto::{ChatRequest, ChatResponse, ErrorBody};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub relay: Arc<SubmitTurnHandler>,
}

impl ChatAppState {
    /// Creates a new ChatAppState.
    pub fn new(relay: Arc<SubmitTurnHandler>) -> Self {
        Self { relay }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/chat
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat - Relay one user turn to the assistant.
///
/// # Errors
/// - 400 Bad Request: `message` missing or empty after trimming
/// - 500 Internal Server Error: provider failure, non-success terminal run
///   state (named in `details`), empty reply, or poll timeout
pub async fn post_chat(
    State(state): State<ChatAppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    let message = request.message.unwrap_or_default();
    let thread_id = request.thread_id.map(ThreadId::new);

    let reply = state.relay.submit_turn(&message, thread_id).await?;

    Ok((
        StatusCode::OK,
        Json(ChatResponse {
            reply: reply.reply,
            thread_id: reply.thread_id.to_string(),
        }),
    ))
}

/// GET /health - Liveness probe.
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ════════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════════

/// Wire-level wrapper around [`RelayError`].
#[derive(Debug)]
pub struct ChatApiError(RelayError);

impl From<RelayError> for ChatApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            RelayError::InvalidInput => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Message is required"),
            ),
            RelayError::RunNotCompleted { status } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::with_details(
                    "Assistant run did not complete successfully",
                    status.as_str(),
                ),
            ),
            RelayError::Timeout { waited_secs } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::with_details(
                    format!("Assistant run did not finish within {waited_secs}s"),
                    "timeout",
                ),
            ),
            RelayError::EmptyReply => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("No text response from assistant"),
            ),
            RelayError::Provider(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new(err.to_string()),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "chat request failed");
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ProviderError, RunStatus};

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invalid_input_maps_to_400() {
        let response = ChatApiError(RelayError::InvalidInput).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert_eq!(body.error, "Message is required");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn failed_run_maps_to_500_with_status_details() {
        let response = ChatApiError(RelayError::RunNotCompleted {
            status: RunStatus::Failed,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.details.as_deref(), Some("failed"));
    }

    #[tokio::test]
    async fn timeout_is_surfaced_distinctly() {
        let response = ChatApiError(RelayError::Timeout { waited_secs: 120 }).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.details.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn provider_error_maps_to_500() {
        let response = ChatApiError(RelayError::Provider(ProviderError::Transport(
            "connection refused".to_string(),
        )))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert!(body.error.contains("connection refused"));
    }
}
