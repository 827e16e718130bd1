//! Chat endpoints: text queries and image → follow-up queries

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Instant;

use crate::error::{classify, classify_validation, Outcome, OutcomeKind};
use crate::server::state::AppState;
use crate::types::{AugmentedAnswer, ImageFollowUpResult, ImageQuery, TextQuery};
use crate::validation::{validate_image, validate_text};

/// A classified failure, rendered as `{error, details?}`
#[derive(Debug)]
pub struct ApiError(pub Outcome);

impl ApiError {
    /// Malformed or undecodable request body
    fn from_rejection(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        Self(Outcome {
            kind: OutcomeKind::ClientError,
            message: "Validation failed".to_string(),
            details: Some(vec![rejection.body_text()]),
        })
    }
}

impl From<Outcome> for ApiError {
    fn from(outcome: Outcome) -> Self {
        Self(outcome)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            OutcomeKind::ClientError => StatusCode::BAD_REQUEST,
            OutcomeKind::AuthError => StatusCode::UNAUTHORIZED,
            OutcomeKind::TimeoutError => StatusCode::REQUEST_TIMEOUT,
            OutcomeKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self.0.details {
            Some(details) => json!({ "error": self.0.message, "details": details }),
            None => json!({ "error": self.0.message }),
        };

        (status, Json(body)).into_response()
    }
}

/// POST /api/v1/AzureOpenAI/chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<TextQuery>, JsonRejection>,
) -> Result<Json<AugmentedAnswer>, ApiError> {
    let Json(query) = payload.map_err(ApiError::from_rejection)?;

    let validation = validate_text(Some(&query));
    if !validation.valid {
        return Err(classify_validation(&validation).into());
    }

    let start = Instant::now();
    tracing::info!(
        "Chat query ({} chars, retrieval: {})",
        query.user_query.chars().count(),
        query.use_retrieval
    );

    let answer = state
        .orchestrator()
        .run_text_query(&query)
        .await
        .map_err(|e| ApiError(classify(&e, "Query processing")))?;

    tracing::info!(
        "Chat answered in {}ms with {} citations",
        start.elapsed().as_millis(),
        answer.citations.len()
    );

    Ok(Json(answer))
}

/// POST /api/v1/AzureOpenAI/chat-with-image
pub async fn chat_with_image(
    State(state): State<AppState>,
    payload: Result<Json<ImageQuery>, JsonRejection>,
) -> Result<Json<ImageFollowUpResult>, ApiError> {
    let Json(query) = payload.map_err(ApiError::from_rejection)?;

    let validation = validate_image(Some(&query));
    if !validation.valid {
        return Err(classify_validation(&validation).into());
    }

    let start = Instant::now();
    tracing::info!("Image query for {}", query.image_url);

    let result = state
        .orchestrator()
        .run_image_query(&query)
        .await
        .map_err(|e| ApiError(classify(&e, "Image query processing")))?;

    tracing::info!(
        "Image query answered in {}ms with {} citations",
        start.elapsed().as_millis(),
        result.follow_up.citations.len()
    );

    Ok(Json(result))
}
