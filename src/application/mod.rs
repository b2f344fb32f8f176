//! Application layer - relay orchestration and the conversation client.

pub mod client;
pub mod relay;
