//! TrustNet-AI API Server
//!
//! REST API endpoints for the TrustNet-AI frontend: text and image
//! trustworthiness analysis, plus follow-up chat about a result.

use std::{net::SocketAddr, sync::Arc};

use axum::http::{header, HeaderValue, Method};
use llm_client::{LlmClient, LlmConfig, OpenAiClient};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::ServerConfig;
use service::AiService;

mod config;
mod error;
mod prompts;
mod routes;
mod service;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ai: AiService,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,llm_client=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TrustNet-AI API Server...");

    let server_config = ServerConfig::from_env()?;
    let llm_config = LlmConfig::from_env()?;

    let llm = OpenAiClient::new(llm_config)?;
    tracing::info!(
        "Using {} chat completions ({})",
        llm.provider(),
        llm.config().target()
    );

    // Create app state
    let state = Arc::new(AppState {
        ai: AiService::new(Arc::new(llm)),
    });

    // Build router
    let app = routes::app(state).layer(cors_layer(&server_config.allowed_origins));
    let app = if server_config.is_development() {
        app.layer(tower_http::trace::TraceLayer::new_for_http())
    } else {
        app
    };

    let addr: SocketAddr = format!("{}:{}", server_config.host, server_config.port).parse()?;
    tracing::info!("Environment: {}", server_config.app_env);
    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server closed");

    Ok(())
}

/// CORS restricted to the configured frontend origins, with credentials
fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.iter().cloned()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for SIGINT: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("SIGINT signal received: closing HTTP server"),
        _ = terminate => tracing::info!("SIGTERM signal received: closing HTTP server"),
    }
}
