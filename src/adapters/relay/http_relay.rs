//! HTTP relay adapter - Implementation of TurnRelay over the wire.
//!
//! Posts to the relay service's `POST /api/chat` endpoint and translates the
//! wire contract back into the client's port types. Mirrors the error
//! reading on the browser side of the original front end: a non-success
//! response is read as text first, then parsed as an error body if possible.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::adapters::http::chat::{ChatRequest, ChatResponse, ErrorBody};
use crate::domain::conversation::ThreadId;
use crate::ports::{RelayCallError, TurnRelay, TurnReply};

/// Turn relay over HTTP.
pub struct HttpTurnRelay {
    base_url: String,
    client: Client,
}

impl HttpTurnRelay {
    /// Creates a relay targeting `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl TurnRelay for HttpTurnRelay {
    async fn submit_turn(
        &self,
        utterance: &str,
        thread_id: Option<&ThreadId>,
    ) -> Result<TurnReply, RelayCallError> {
        let request = ChatRequest {
            message: Some(utterance.to_string()),
            thread_id: thread_id.map(|id| id.as_str().to_string()),
        };

        let response = self
            .client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| RelayCallError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| RelayCallError::Transport(e.to_string()))?;
            let (message, details) = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => (parsed.error, parsed.details),
                Err(_) if !body.is_empty() => (body, None),
                Err(_) => (format!("API request failed with status {status}"), None),
            };
            return Err(RelayCallError::Rejected {
                status: status.as_u16(),
                message,
                details,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| RelayCallError::Malformed(e.to_string()))?;

        Ok(TurnReply {
            reply: body.reply,
            thread_id: ThreadId::new(body.thread_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_appends_api_path() {
        let relay = HttpTurnRelay::new("http://localhost:8080");
        assert_eq!(relay.chat_url(), "http://localhost:8080/api/chat");
    }
}
