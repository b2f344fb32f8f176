//! Axum routes for the chat endpoint.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{health, post_chat, ChatAppState};

/// Creates routes for chat endpoints.
///
/// REST Endpoints:
/// - POST /api/chat - Relay one user turn to the assistant
/// - GET /health - Liveness probe
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new().route("/chat", post(post_chat))
}

/// Combined router: chat routes nested under /api plus the health probe.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new()
        .nest("/api", chat_routes())
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_routes_creates_valid_router() {
        let _routes = chat_routes();
    }

    #[test]
    fn chat_router_creates_combined_router() {
        let _router = chat_router();
    }
}
