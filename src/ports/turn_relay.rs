//! Turn Relay Port - the conversation client's view of the relay service.
//!
//! The client submits one utterance at a time and receives either a reply
//! with a thread token, or a call error it converts into a visible transcript
//! entry. Implementations may go over HTTP or call the relay in-process.

use async_trait::async_trait;

use crate::domain::conversation::ThreadId;

/// Port used by the conversation client to submit a turn.
#[async_trait]
pub trait TurnRelay: Send + Sync {
    /// Submits one user utterance, continuing `thread_id` when present.
    async fn submit_turn(
        &self,
        utterance: &str,
        thread_id: Option<&ThreadId>,
    ) -> Result<TurnReply, RelayCallError>;
}

/// Successful outcome of a relayed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    /// The assistant's reply text.
    pub reply: String,
    /// The (possibly newly created) thread token to reuse on the next turn.
    pub thread_id: ThreadId,
}

/// Failure observed by the client when calling the relay.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RelayCallError {
    /// The relay answered with a non-success status and an error body.
    #[error("{message}")]
    Rejected {
        /// HTTP status returned by the relay.
        status: u16,
        /// The relay's `error` field.
        message: String,
        /// The relay's `details` field, when present.
        details: Option<String>,
    },

    /// The relay could not be reached.
    #[error("could not reach the assistant service: {0}")]
    Transport(String),

    /// The relay answered but the body could not be parsed.
    #[error("malformed response from the assistant service: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_relay_message() {
        let err = RelayCallError::Rejected {
            status: 500,
            message: "Assistant run did not complete successfully".to_string(),
            details: Some("failed".to_string()),
        };
        assert_eq!(err.to_string(), "Assistant run did not complete successfully");
    }

    #[test]
    fn transport_error_mentions_service() {
        let err = RelayCallError::Transport("connection refused".to_string());
        assert!(err.to_string().contains("could not reach"));
    }
}
