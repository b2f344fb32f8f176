//! Mock turn relay for testing the conversation client.
//!
//! Scripted replies/errors consumed in order, an optional per-call delay for
//! exercising the in-flight gate, and a call log for verification.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::ThreadId;
use crate::ports::{RelayCallError, TurnRelay, TurnReply};

/// Mock turn relay with scripted outcomes.
#[derive(Debug, Clone, Default)]
pub struct MockTurnRelay {
    outcomes: Arc<Mutex<VecDeque<Result<TurnReply, RelayCallError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<(String, Option<ThreadId>)>>>,
}

impl MockTurnRelay {
    /// Creates a mock with no scripted outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, reply: TurnReply) -> Self {
        self.outcomes.lock().unwrap().push_back(Ok(reply));
        self
    }

    /// Queues a call error.
    pub fn with_error(self, error: RelayCallError) -> Self {
        self.outcomes.lock().unwrap().push_back(Err(error));
        self
    }

    /// Simulates latency on every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns a handle to the call log: `(utterance, thread_id)` per call.
    pub fn calls(&self) -> Arc<Mutex<Vec<(String, Option<ThreadId>)>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl TurnRelay for MockTurnRelay {
    async fn submit_turn(
        &self,
        utterance: &str,
        thread_id: Option<&ThreadId>,
    ) -> Result<TurnReply, RelayCallError> {
        self.calls
            .lock()
            .unwrap()
            .push((utterance.to_string(), thread_id.cloned()));

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.outcomes.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(RelayCallError::Transport(
                "mock relay has no scripted outcome".to_string(),
            ))
        })
    }
}
