//! Query orchestration
//!
//! Text queries are a single completion. Image queries chain two: the image
//! is described first, then the description is substituted into the
//! follow-up template and answered with retrieval enabled.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::providers::{CompletionProvider, CompletionRequest, ImageCompletionRequest};
use crate::types::query::{clamp_temperature, FOLLOW_UP_SLOT};
use crate::types::{AugmentedAnswer, ImageFollowUpResult, ImageQuery, TextQuery};

/// Key the image answer may carry when the model replies with a JSON object
const DESCRIPTION_KEY: &str = "place_description";

/// Runs validated queries against a completion provider
#[derive(Clone)]
pub struct ChatOrchestrator {
    provider: Arc<dyn CompletionProvider>,
}

impl ChatOrchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Answer a text query
    pub async fn run_text_query(&self, query: &TextQuery) -> Result<AugmentedAnswer> {
        let request = CompletionRequest {
            system_prompt: query.system_prompt.clone(),
            user_query: query.user_query.clone(),
            use_retrieval: query.use_retrieval,
            temperature: clamp_temperature(query.temperature),
        };

        tracing::debug!(
            "Text completion via {} (retrieval: {})",
            self.provider.name(),
            request.use_retrieval
        );

        self.provider.complete(&request).await
    }

    /// Describe an image, then answer the follow-up built from that description
    pub async fn run_image_query(&self, query: &ImageQuery) -> Result<ImageFollowUpResult> {
        let temperature = clamp_temperature(query.temperature);

        let image_request = ImageCompletionRequest {
            system_prompt: query.system_prompt.clone(),
            initial_query: query.initial_image_query.clone(),
            image_url: query.image_url.clone(),
            temperature,
        };

        tracing::debug!("Image completion via {} for {}", self.provider.name(), query.image_url);
        let image_answer = self.provider.complete_with_image(&image_request).await?;

        let description = extract_description(&image_answer);
        let follow_up_query = build_follow_up(&query.follow_up_template, &description);

        // Follow-up always consults the retrieval index
        let follow_up_request = CompletionRequest {
            system_prompt: query.system_prompt.clone(),
            user_query: follow_up_query,
            use_retrieval: true,
            temperature,
        };

        tracing::debug!("Follow-up completion: \"{}\"", follow_up_request.user_query);
        let follow_up = self
            .provider
            .complete_follow_up(&query.image_url, &follow_up_request)
            .await?;

        Ok(ImageFollowUpResult {
            image_answer,
            follow_up,
        })
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

/// Pull the description out of an image answer
///
/// A flat JSON object with a string `place_description` yields that value.
/// Anything else yields the answer unchanged.
pub fn extract_description(image_answer: &str) -> String {
    serde_json::from_str::<HashMap<String, String>>(image_answer)
        .ok()
        .and_then(|mut fields| fields.remove(DESCRIPTION_KEY))
        .unwrap_or_else(|| image_answer.to_string())
}

/// Substitute `description` into every `{0}` slot of `template`
pub fn build_follow_up(template: &str, description: &str) -> String {
    template.replace(FOLLOW_UP_SLOT, description)
}
