//! Conversation client.
//!
//! Presents a linear transcript, serializes turn submission through the
//! relay, and keeps the loading flag consistent with exactly one outstanding
//! request. All mutation goes through the [`Conversation`] aggregate; this
//! client only sequences the async call around it.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::conversation::{BeginSend, Conversation, ThreadId, Turn, TurnOutcome};
use crate::ports::TurnRelay;

/// Prefix for the synthetic assistant turn shown when a send fails.
const ERROR_TURN_PREFIX: &str = "Sorry, I encountered an error.";

/// Outcome of a [`ConversationClient::send`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The assistant replied and the turn was appended.
    Replied,
    /// The relay failed; a synthetic error turn was appended.
    Failed,
    /// The utterance was empty after trimming; nothing happened.
    EmptyInput,
    /// Another turn was still in flight; the call was ignored.
    Busy,
    /// A new conversation was started mid-flight; the result was discarded.
    Superseded,
}

/// Client-side conversation driver.
///
/// Safe to share behind an `Arc`; concurrent `send` calls are serialized by
/// the sending gate, not by blocking each other for the duration of the
/// network call.
pub struct ConversationClient {
    relay: Arc<dyn TurnRelay>,
    state: Mutex<Conversation>,
}

impl ConversationClient {
    /// Creates a client over the given relay with an empty conversation.
    pub fn new(relay: Arc<dyn TurnRelay>) -> Self {
        Self {
            relay,
            state: Mutex::new(Conversation::new()),
        }
    }

    /// Sends one utterance and waits for it to settle.
    ///
    /// The user turn is appended and the loading flag raised before any
    /// network activity; the flag is cleared on every exit path. While a turn
    /// is in flight, further calls return [`SendOutcome::Busy`] without
    /// issuing a request.
    pub async fn send(&self, utterance: &str) -> SendOutcome {
        let (epoch, thread_id) = {
            let mut conversation = self.state.lock().await;
            match conversation.begin_send(utterance) {
                BeginSend::Started { epoch, thread_id } => (epoch, thread_id),
                BeginSend::EmptyInput => return SendOutcome::EmptyInput,
                BeginSend::Busy => return SendOutcome::Busy,
            }
        };

        // The state lock is not held across this await; the sending flag is
        // what keeps the conversation serialized.
        let result = self
            .relay
            .submit_turn(utterance.trim(), thread_id.as_ref())
            .await;

        let outcome = match &result {
            Ok(reply) => TurnOutcome::Reply {
                text: reply.reply.clone(),
                thread_id: reply.thread_id.clone(),
            },
            Err(err) => {
                tracing::warn!(error = %err, "turn failed, surfacing error turn");
                TurnOutcome::Failure {
                    message: format!("{ERROR_TURN_PREFIX} {err}"),
                }
            }
        };

        let mut conversation = self.state.lock().await;
        if !conversation.settle(epoch, outcome) {
            tracing::debug!(epoch, "discarding reply for superseded conversation");
            return SendOutcome::Superseded;
        }

        match result {
            Ok(_) => SendOutcome::Replied,
            Err(_) => SendOutcome::Failed,
        }
    }

    /// Begins an unrelated conversation, discarding any in-flight result.
    pub async fn start_new_conversation(&self) {
        self.state.lock().await.start_new();
    }

    /// Returns a snapshot of the transcript in insertion order.
    pub async fn transcript(&self) -> Vec<Turn> {
        self.state.lock().await.turns().to_vec()
    }

    /// Returns the current thread token, if one has been issued.
    pub async fn thread_id(&self) -> Option<ThreadId> {
        self.state.lock().await.thread_id().cloned()
    }

    /// Returns true while a turn is in flight.
    pub async fn is_sending(&self) -> bool {
        self.state.lock().await.is_sending()
    }

    /// Replaces the draft input buffer.
    pub async fn set_draft(&self, draft: impl Into<String>) {
        self.state.lock().await.set_draft(draft);
    }

    /// Returns the draft input buffer.
    pub async fn draft(&self) -> String {
        self.state.lock().await.draft().to_string()
    }
}
