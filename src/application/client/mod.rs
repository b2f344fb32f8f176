//! Conversation client - transcript ownership and send serialization.

mod conversation_client;

pub use conversation_client::{ConversationClient, SendOutcome};
