//! HTTP DTOs for the chat endpoint.
//!
//! These types are shared with the HTTP relay adapter on the client side, so
//! both ends of the wire agree on the body shapes.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's utterance. Modeled as optional so a missing field maps to
    /// our 400 response rather than a framework rejection.
    pub message: Option<String>,
    /// Thread token from a previous turn; absent on the first turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// 200 response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// The assistant's reply text.
    pub reply: String,
    /// The thread token to pass on the next turn.
    pub thread_id: String,
}

/// Error response body (400/500).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
    /// Diagnostic detail, e.g. the terminal run status name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    /// Creates an error body without details.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Creates an error body with diagnostic details.
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_accepts_camel_case_thread_id() {
        let request: ChatRequest =
            serde_json::from_str(r#"{ "message": "hi", "threadId": "t_123" }"#).unwrap();
        assert_eq!(request.message.as_deref(), Some("hi"));
        assert_eq!(request.thread_id.as_deref(), Some("t_123"));
    }

    #[test]
    fn chat_request_tolerates_missing_fields() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(request.message.is_none());
        assert!(request.thread_id.is_none());
    }

    #[test]
    fn chat_response_serializes_camel_case() {
        let response = ChatResponse {
            reply: "Loamy soil.".to_string(),
            thread_id: "t_123".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("threadId"));
        assert!(!json.contains("thread_id"));
    }

    #[test]
    fn error_body_omits_absent_details() {
        let json = serde_json::to_string(&ErrorBody::new("boom")).unwrap();
        assert!(!json.contains("details"));

        let json = serde_json::to_string(&ErrorBody::with_details("boom", "failed")).unwrap();
        assert!(json.contains("\"details\":\"failed\""));
    }
}
