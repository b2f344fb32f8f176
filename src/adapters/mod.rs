//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the core to external systems:
//! - `ai` - Assistant provider implementations (OpenAI Assistants, mock)
//! - `http` - Axum wire boundary for the relay service
//! - `relay` - Transports the conversation client uses to reach the relay

pub mod ai;
pub mod http;
pub mod relay;
