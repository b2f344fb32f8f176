//! Conversation domain: transcript, turns, and the client state machine.

mod conversation;
mod thread;
mod turn;

pub use conversation::{BeginSend, Conversation, TurnOutcome};
pub use thread::ThreadId;
pub use turn::{Role, Turn, TurnId};
