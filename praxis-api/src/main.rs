//! Praxis API Server Entry Point
//!
//! Bootstraps tracing, configuration, the document store and the chat
//! provider, then starts the Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use praxis_api::{create_api_router, ApiConfig, ApiError, ApiResult, AppState};
use praxis_llm::{AnthropicProvider, ChatProvider};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env();

    let chat: Option<Arc<dyn ChatProvider>> = match &config.anthropic_api_key {
        Some(key) => {
            tracing::info!(model = %config.chat_model, "Chat provider configured");
            Some(Arc::new(AnthropicProvider::new(
                key.clone(),
                config.chat_model.clone(),
            )))
        }
        None => {
            tracing::warn!("No chat provider credential configured; /chat will fail");
            None
        }
    };

    let state = AppState::in_memory(chat);
    state.ensure_indexes().await.map_err(ApiError::from)?;

    let app: Router = create_api_router(state, &config);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting Praxis API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("PRAXIS_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("PRAXIS_API_PORT").ok())
        .unwrap_or_else(|| "3000".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
