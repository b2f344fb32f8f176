//! In-process relay adapter.
//!
//! Lets the conversation client call the relay's SubmitTurn handler directly,
//! without an HTTP hop. The error mapping mirrors the HTTP status mapping so
//! the client sees the same taxonomy either way.

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::relay::{RelayError, SubmitTurnHandler};
use crate::domain::conversation::ThreadId;
use crate::ports::{RelayCallError, TurnRelay, TurnReply};

/// Turn relay that calls the relay handler in-process.
pub struct InProcessRelay {
    handler: Arc<SubmitTurnHandler>,
}

impl InProcessRelay {
    /// Creates a relay over the given handler.
    pub fn new(handler: Arc<SubmitTurnHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl TurnRelay for InProcessRelay {
    async fn submit_turn(
        &self,
        utterance: &str,
        thread_id: Option<&ThreadId>,
    ) -> Result<TurnReply, RelayCallError> {
        self.handler
            .submit_turn(utterance, thread_id.cloned())
            .await
            .map_err(|err| {
                let status = match err {
                    RelayError::InvalidInput => 400,
                    _ => 500,
                };
                let details = match &err {
                    RelayError::RunNotCompleted { status } => Some(status.as_str().to_string()),
                    RelayError::Timeout { .. } => Some("timeout".to_string()),
                    _ => None,
                };
                RelayCallError::Rejected {
                    status,
                    message: err.to_string(),
                    details,
                }
            })
    }
}
