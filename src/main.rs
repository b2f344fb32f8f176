//! Garden Sage relay service binary.
//!
//! Loads configuration from the environment, fails fast on a missing
//! assistant credential, and serves the chat relay over HTTP.

use std::process::exit;
use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use garden_sage::adapters::ai::{OpenAiAssistants, OpenAiAssistantsConfig};
use garden_sage::adapters::http::chat::{chat_router, ChatAppState};
use garden_sage::application::relay::SubmitTurnHandler;
use garden_sage::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            exit(1);
        }
    };

    init_tracing(&config);

    // Credential and profile are checked once here, never per-request.
    if let Err(err) = config.validate() {
        tracing::error!(error = %err, "invalid configuration");
        exit(1);
    }
    let (Some(api_key), Some(assistant_id)) = (
        config.assistant.api_key.clone(),
        config.assistant.assistant_id.clone(),
    ) else {
        tracing::error!("assistant credential or profile missing after validation");
        exit(1);
    };
    tracing::info!(assistant_id = %assistant_id, "configuration validated");

    let provider = OpenAiAssistants::new(
        OpenAiAssistantsConfig::new(api_key)
            .with_base_url(config.assistant.base_url.clone())
            .with_timeout(config.assistant.timeout()),
    );
    let relay = SubmitTurnHandler::new(Arc::new(provider), assistant_id)
        .with_poll_interval(config.assistant.poll_interval())
        .with_max_poll_attempts(config.assistant.max_poll_attempts);

    let app = chat_router()
        .with_state(ChatAppState::new(Arc::new(relay)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server));

    let addr = config.server.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%addr, error = %err, "failed to bind");
            exit(1);
        }
    };
    tracing::info!(%addr, "garden-sage listening");

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "server error");
        exit(1);
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
