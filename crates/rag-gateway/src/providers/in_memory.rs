//! Deterministic in-memory completion provider
//!
//! Answers come from lookup tables filled in before the provider is shared.
//! Registration takes `&mut self`, so once the provider sits behind an `Arc`
//! its tables are read-only.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::types::{AugmentedAnswer, Citation};

use super::completion::{CompletionProvider, CompletionRequest, ImageCompletionRequest};

const SIMULATED_PREFIX: &str = "This is a simulated response to: ";
const SIMULATED_FOLLOW_UP: &str = "This is a simulated follow-up information about the image.";

/// Lookup-table provider used for tests and offline runs
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    /// Exact query → plain answer
    text_responses: HashMap<String, String>,
    /// Exact query → answer with citations
    augmented_responses: HashMap<String, AugmentedAnswer>,
    /// Exact image URL → (image answer, follow-up answer)
    image_responses: HashMap<String, (String, AugmentedAnswer)>,
}

impl InMemoryProvider {
    /// Create an empty provider; every query gets a simulated answer
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a plain answer for `query`
    pub fn register_text_response(&mut self, query: impl Into<String>, response: impl Into<String>) {
        self.text_responses.insert(query.into(), response.into());
    }

    /// Add or replace a cited answer for `query`
    pub fn register_augmented_response(&mut self, query: impl Into<String>, response: AugmentedAnswer) {
        self.augmented_responses.insert(query.into(), response);
    }

    /// Add or replace the image answer and follow-up answer for `image_url`
    pub fn register_image_response(
        &mut self,
        image_url: impl Into<String>,
        image_response: impl Into<String>,
        follow_up: AugmentedAnswer,
    ) {
        self.image_responses
            .insert(image_url.into(), (image_response.into(), follow_up));
    }

    /// Chainable form of [`register_text_response`](Self::register_text_response)
    pub fn with_text_response(mut self, query: impl Into<String>, response: impl Into<String>) -> Self {
        self.register_text_response(query, response);
        self
    }

    /// Chainable form of [`register_augmented_response`](Self::register_augmented_response)
    pub fn with_augmented_response(mut self, query: impl Into<String>, response: AugmentedAnswer) -> Self {
        self.register_augmented_response(query, response);
        self
    }

    /// Chainable form of [`register_image_response`](Self::register_image_response)
    pub fn with_image_response(
        mut self,
        image_url: impl Into<String>,
        image_response: impl Into<String>,
        follow_up: AugmentedAnswer,
    ) -> Self {
        self.register_image_response(image_url, image_response, follow_up);
        self
    }

    fn resolve(&self, query: &str) -> AugmentedAnswer {
        if let Some(answer) = self.augmented_responses.get(query) {
            return answer.clone();
        }

        if let Some(text) = self.text_responses.get(query) {
            return AugmentedAnswer::uncited(text.clone());
        }

        AugmentedAnswer::new(
            format!("{}{}", SIMULATED_PREFIX, query),
            vec![Citation::new("Simulated Source", "https://example.com/simulated")],
        )
    }
}

#[async_trait]
impl CompletionProvider for InMemoryProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<AugmentedAnswer> {
        Ok(self.resolve(&request.user_query))
    }

    async fn complete_with_image(&self, request: &ImageCompletionRequest) -> Result<String> {
        Ok(match self.image_responses.get(&request.image_url) {
            Some((image_response, _)) => image_response.clone(),
            None => format!("This is a simulated image analysis for: {}", request.image_url),
        })
    }

    async fn complete_follow_up(
        &self,
        image_url: &str,
        _request: &CompletionRequest,
    ) -> Result<AugmentedAnswer> {
        Ok(match self.image_responses.get(image_url) {
            Some((_, follow_up)) => follow_up.clone(),
            None => AugmentedAnswer::new(
                SIMULATED_FOLLOW_UP,
                vec![Citation::new("Simulated Image Source", "https://example.com/images")],
            ),
        })
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
