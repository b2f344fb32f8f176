//! OpenAI Assistants adapter - Implementation of AssistantProvider.
//!
//! Drives the Assistants v2 REST API: threads, thread messages, and runs.
//! All conversation state lives on the provider side; this adapter only
//! translates between the wire format and our port types.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiAssistantsConfig::new(api_key)
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAiAssistants::new(config);
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::domain::conversation::{Role, ThreadId};
use crate::ports::{AssistantProvider, ProviderError, ProviderMessage, RunId, RunStatus};

/// Configuration for the OpenAI Assistants adapter.
#[derive(Debug, Clone)]
pub struct OpenAiAssistantsConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Per-call HTTP timeout.
    pub timeout: Duration,
}

impl OpenAiAssistantsConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI Assistants API adapter.
pub struct OpenAiAssistants {
    config: OpenAiAssistantsConfig,
    client: Client,
}

impl OpenAiAssistants {
    /// Creates a new adapter with the given configuration.
    pub fn new(config: OpenAiAssistantsConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Attaches the auth and Assistants v2 headers every call needs.
    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(self.config.api_key())
            .header("OpenAI-Beta", "assistants=v2")
    }

    /// Checks the response status, surfacing the provider's error message.
    async fn check(&self, response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ProviderError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AssistantProvider for OpenAiAssistants {
    async fn create_thread(&self) -> Result<ThreadId, ProviderError> {
        let response = self
            .authed(self.client.post(self.url("/threads")))
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let thread: ThreadObject = self.decode(self.check(response).await?).await?;
        Ok(ThreadId::new(thread.id))
    }

    async fn add_user_message(
        &self,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<(), ProviderError> {
        let response = self
            .authed(
                self.client
                    .post(self.url(&format!("/threads/{thread_id}/messages"))),
            )
            .json(&json!({ "role": "user", "content": content }))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        self.check(response).await?;
        Ok(())
    }

    async fn create_run(
        &self,
        thread_id: &ThreadId,
        assistant_id: &str,
    ) -> Result<RunId, ProviderError> {
        let response = self
            .authed(
                self.client
                    .post(self.url(&format!("/threads/{thread_id}/runs"))),
            )
            .json(&json!({ "assistant_id": assistant_id }))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let run: RunObject = self.decode(self.check(response).await?).await?;
        Ok(RunId::new(run.id))
    }

    async fn run_status(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
    ) -> Result<RunStatus, ProviderError> {
        let response = self
            .authed(
                self.client
                    .get(self.url(&format!("/threads/{thread_id}/runs/{run_id}"))),
            )
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let run: RunObject = self.decode(self.check(response).await?).await?;
        Ok(run.status)
    }

    async fn list_messages(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Vec<ProviderMessage>, ProviderError> {
        let response = self
            .authed(
                self.client
                    .get(self.url(&format!("/threads/{thread_id}/messages"))),
            )
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let list: MessageList = self.decode(self.check(response).await?).await?;
        Ok(list
            .data
            .into_iter()
            .filter_map(message_from_wire)
            .collect())
    }
}

/// Translates one wire message, skipping roles we do not render.
fn message_from_wire(message: MessageObject) -> Option<ProviderMessage> {
    let role = match message.role.as_str() {
        "user" => Role::User,
        "assistant" => Role::Assistant,
        _ => return None,
    };

    let text = message
        .content
        .into_iter()
        .find(|part| part.kind == "text")
        .and_then(|part| part.text)
        .map(|t| t.value);

    Some(ProviderMessage {
        role,
        created_at: DateTime::<Utc>::from_timestamp(message.created_at, 0).unwrap_or_default(),
        text,
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunObject {
    id: String,
    status: RunStatus,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    data: Vec<MessageObject>,
}

#[derive(Debug, Deserialize)]
struct MessageObject {
    role: String,
    created_at: i64,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    text: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_object_decodes_status() {
        let run: RunObject = serde_json::from_str(
            r#"{ "id": "run_abc", "status": "in_progress", "thread_id": "thread_x" }"#,
        )
        .unwrap();
        assert_eq!(run.id, "run_abc");
        assert_eq!(run.status, RunStatus::InProgress);
    }

    #[test]
    fn message_from_wire_extracts_text_part() {
        let message: MessageObject = serde_json::from_str(
            r#"{
                "role": "assistant",
                "created_at": 1735689600,
                "content": [
                    { "type": "image_file", "text": null },
                    { "type": "text", "text": { "value": "Loamy soil." } }
                ]
            }"#,
        )
        .unwrap();

        let message = message_from_wire(message).unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.text.as_deref(), Some("Loamy soil."));
    }

    #[test]
    fn message_from_wire_skips_unknown_roles() {
        let message = MessageObject {
            role: "tool".to_string(),
            created_at: 0,
            content: vec![],
        };
        assert!(message_from_wire(message).is_none());
    }

    #[test]
    fn message_without_text_part_has_no_text() {
        let message = MessageObject {
            role: "assistant".to_string(),
            created_at: 0,
            content: vec![],
        };
        assert_eq!(message_from_wire(message).unwrap().text, None);
    }

    #[test]
    fn api_error_envelope_decodes() {
        let envelope: ApiErrorEnvelope = serde_json::from_str(
            r#"{ "error": { "message": "Invalid assistant", "type": "invalid_request_error" } }"#,
        )
        .unwrap();
        assert_eq!(envelope.error.message, "Invalid assistant");
    }

    #[test]
    fn config_builder_overrides_base_url() {
        let config = OpenAiAssistantsConfig::new(Secret::new("sk-xxx".to_string()))
            .with_base_url("http://localhost:9000/v1")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, "http://localhost:9000/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
