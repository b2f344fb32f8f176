//! SubmitTurn handler.
//!
//! Converts one user utterance into one assistant reply, hiding the
//! provider's asynchronous run model behind a synchronous call: create or
//! continue the thread, append the utterance, start a run against the
//! configured assistant profile, poll until terminal, extract the reply.
//!
//! The handler holds no state across calls; the thread token travels with
//! the request and response.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;

use crate::domain::conversation::{Role, ThreadId};
use crate::ports::{AssistantProvider, ProviderError, RunId, RunStatus, TurnReply};

/// Default interval between run status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default poll budget (~2 minutes at the default interval).
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 240;

/// Errors that can occur while relaying a turn.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Utterance was empty after trimming; no provider call was made.
    #[error("Message is required")]
    InvalidInput,

    /// The provider could not be reached or rejected a call.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The run reached a terminal state other than completed.
    #[error("Assistant run did not complete successfully")]
    RunNotCompleted {
        /// The terminal status, for diagnosability.
        status: RunStatus,
    },

    /// The run completed but no assistant text could be extracted.
    #[error("No text response from assistant")]
    EmptyReply,

    /// The run stayed non-terminal past the poll budget.
    #[error("Assistant run did not finish within {waited_secs}s")]
    Timeout {
        /// Total time spent polling.
        waited_secs: u64,
    },
}

/// Handler that relays one turn to the assistant provider.
pub struct SubmitTurnHandler {
    provider: Arc<dyn AssistantProvider>,
    assistant_id: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl SubmitTurnHandler {
    /// Creates a handler with the default poll interval and budget.
    pub fn new(provider: Arc<dyn AssistantProvider>, assistant_id: impl Into<String>) -> Self {
        Self {
            provider,
            assistant_id: assistant_id.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }

    /// Sets the interval between status polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the maximum number of status polls before giving up.
    pub fn with_max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    /// Relays one utterance and returns the reply plus thread token.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the utterance trims to empty (checked before any
    ///   provider call)
    /// - `Provider` for transport/API/decoding failures
    /// - `RunNotCompleted` when the run ends in a non-success terminal state
    /// - `EmptyReply` when the run completes without extractable text
    /// - `Timeout` when the poll budget is exhausted
    pub async fn submit_turn(
        &self,
        utterance: &str,
        thread_id: Option<ThreadId>,
    ) -> Result<TurnReply, RelayError> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(RelayError::InvalidInput);
        }

        let thread_id = match thread_id {
            Some(id) => id,
            None => {
                let id = self.provider.create_thread().await?;
                tracing::debug!(thread_id = %id, "created new thread");
                id
            }
        };

        self.provider.add_user_message(&thread_id, utterance).await?;
        let run_id = self.provider.create_run(&thread_id, &self.assistant_id).await?;
        tracing::debug!(thread_id = %thread_id, run_id = %run_id, "run started");

        let status = self.wait_for_run(&thread_id, &run_id).await?;
        if status != RunStatus::Completed {
            tracing::warn!(thread_id = %thread_id, run_id = %run_id, %status, "run ended without completing");
            return Err(RelayError::RunNotCompleted { status });
        }

        let reply = self.extract_reply(&thread_id).await?;
        tracing::debug!(thread_id = %thread_id, reply_len = reply.len(), "reply extracted");

        Ok(TurnReply { reply, thread_id })
    }

    /// Polls the run until it leaves `queued`/`in_progress` or the budget
    /// runs out.
    async fn wait_for_run(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
    ) -> Result<RunStatus, RelayError> {
        for _ in 0..self.max_poll_attempts {
            sleep(self.poll_interval).await;
            let status = self.provider.run_status(thread_id, run_id).await?;
            if status.is_terminal() {
                return Ok(status);
            }
        }

        let waited = self.poll_interval * self.max_poll_attempts;
        tracing::warn!(thread_id = %thread_id, run_id = %run_id, waited_secs = waited.as_secs(), "run polling timed out");
        Err(RelayError::Timeout {
            waited_secs: waited.as_secs(),
        })
    }

    /// Fetches the thread and extracts the newest assistant-authored text.
    async fn extract_reply(&self, thread_id: &ThreadId) -> Result<String, RelayError> {
        let mut messages = self.provider.list_messages(thread_id).await?;
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let latest = messages
            .into_iter()
            .find(|m| m.role == Role::Assistant)
            .ok_or(RelayError::EmptyReply)?;

        match latest.text {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(RelayError::EmptyReply),
        }
    }
}
