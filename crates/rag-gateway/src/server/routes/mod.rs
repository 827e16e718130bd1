//! API routes for the gateway

pub mod chat;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Chat routes, mounted under both `/api/v1` and `/api`
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/AzureOpenAI/chat", post(chat::chat))
        .route("/AzureOpenAI/chat-with-image", post(chat::chat_with_image))
}

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/v1", chat_routes())
        .merge(chat_routes())
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "rag-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Retrieval-augmented chat gateway with image-to-follow-up query chaining",
        "endpoints": {
            "POST /api/v1/AzureOpenAI/chat": "Text query with optional retrieval and citations",
            "POST /api/v1/AzureOpenAI/chat-with-image": "Image description chained into a retrieval-augmented follow-up",
            "POST /api/AzureOpenAI/chat": "Unversioned alias of the v1 text route",
            "POST /api/AzureOpenAI/chat-with-image": "Unversioned alias of the v1 image route",
            "GET /api/info": "This document"
        }
    }))
}
