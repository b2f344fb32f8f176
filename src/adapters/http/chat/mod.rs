//! Chat HTTP adapter - the relay service's wire boundary.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChatRequest, ChatResponse, ErrorBody};
pub use handlers::{health, post_chat, ChatApiError, ChatAppState};
pub use routes::{chat_router, chat_routes};
