//! Gateway server binary
//!
//! Run with: cargo run -p rag-gateway --bin rag-gateway-server [config.toml]

use rag_gateway::{config::GatewayConfig, server::GatewayServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_gateway=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Config path: first argument, then RAG_GATEWAY_CONFIG
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RAG_GATEWAY_CONFIG").ok())
        .map(PathBuf::from);

    let config = GatewayConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Configuration loaded");
    if let Some(path) = &config_path {
        tracing::info!("  - File: {}", path.display());
    }
    tracing::info!("  - Backend: {:?}", config.backend);
    tracing::info!("  - OpenAI endpoint: {}", config.openai.endpoint);
    tracing::info!("  - Deployment: {}", config.openai.deployment_name);
    tracing::info!("  - API version: {}", config.openai.api_version);
    tracing::info!("  - Search index: {}", config.search.index_name);

    let server = GatewayServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/v1/AzureOpenAI/chat            - Ask a question");
    println!("  POST /api/v1/AzureOpenAI/chat-with-image - Ask about an image");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
