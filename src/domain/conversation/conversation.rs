//! Conversation aggregate for the client-side transcript.
//!
//! Encapsulates the transcript, the in-flight send flag, the provider thread
//! token and the conversation epoch behind controlled mutation methods, so the
//! turn-ordering invariants are enforced in one place rather than spread over
//! freestanding mutable state.
//!
//! # State machine (per turn)
//!
//! `Idle -> Sending -> Settled -> Idle`
//!
//! - `begin_send` gates entry into `Sending`: at most one turn may be in
//!   flight, and an empty utterance never leaves `Idle`.
//! - `settle` applies exactly one terminal outcome (assistant turn or error
//!   turn) and returns to `Idle`. A result from a superseded epoch is
//!   discarded without touching the current conversation.
//! - `start_new` resets everything and bumps the epoch so any turn still in
//!   flight can no longer be applied.

use super::thread::ThreadId;
use super::turn::Turn;

/// Result of attempting to start a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginSend {
    /// The user turn was appended and the conversation entered `Sending`.
    /// Carries the epoch and thread token captured at send time.
    Started {
        epoch: u64,
        thread_id: Option<ThreadId>,
    },
    /// Utterance was empty after trimming; nothing changed.
    EmptyInput,
    /// A turn is already in flight; nothing changed.
    Busy,
}

/// Terminal outcome of an in-flight turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The relay returned an assistant reply and a thread token to adopt.
    Reply { text: String, thread_id: ThreadId },
    /// The relay failed; `message` is the user-visible failure text.
    Failure { message: String },
}

/// Client-side conversation state.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
    thread_id: Option<ThreadId>,
    draft: String,
    sending: bool,
    epoch: u64,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the transcript in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the current provider thread token, if one has been issued.
    pub fn thread_id(&self) -> Option<&ThreadId> {
        self.thread_id.as_ref()
    }

    /// Returns true while a turn is in flight.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Returns the current conversation epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns the draft input buffer.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replaces the draft input buffer.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Attempts to start sending `utterance`.
    ///
    /// On success the user turn is appended immediately (optimistic echo),
    /// the draft buffer is cleared, and the sending flag is raised. The
    /// returned epoch and thread token must be passed back to [`settle`]
    /// unchanged.
    ///
    /// [`settle`]: Conversation::settle
    pub fn begin_send(&mut self, utterance: &str) -> BeginSend {
        if utterance.trim().is_empty() {
            return BeginSend::EmptyInput;
        }
        if self.sending {
            return BeginSend::Busy;
        }

        self.turns.push(Turn::user(utterance));
        self.draft.clear();
        self.sending = true;

        BeginSend::Started {
            epoch: self.epoch,
            thread_id: self.thread_id.clone(),
        }
    }

    /// Applies the terminal outcome of the turn started under `epoch`.
    ///
    /// Returns `false` when the epoch no longer matches (the conversation was
    /// reset while the turn was in flight); in that case the outcome is
    /// discarded and the current conversation is left untouched.
    ///
    /// On a matching epoch the assistant turn (or synthetic error turn) is
    /// appended, the thread token is adopted on success, and the sending flag
    /// is cleared on every path.
    pub fn settle(&mut self, epoch: u64, outcome: TurnOutcome) -> bool {
        if epoch != self.epoch {
            return false;
        }

        match outcome {
            TurnOutcome::Reply { text, thread_id } => {
                self.turns.push(Turn::assistant(text));
                self.thread_id = Some(thread_id);
            }
            TurnOutcome::Failure { message } => {
                // A failed turn does not invalidate an established thread.
                self.turns.push(Turn::assistant(message));
            }
        }
        self.sending = false;
        true
    }

    /// Begins an unrelated conversation.
    ///
    /// Clears the transcript, thread token, sending flag and draft buffer,
    /// and bumps the epoch so a response still in flight is discarded rather
    /// than applied to the new conversation. Idempotent with respect to the
    /// visible state.
    pub fn start_new(&mut self) {
        self.turns.clear();
        self.thread_id = None;
        self.draft.clear();
        self.sending = false;
        self.epoch += 1;
    }
}
