//! Completion provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::AugmentedAnswer;

/// A single chat completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_query: String,
    /// Attach the retrieval data source
    pub use_retrieval: bool,
    pub temperature: f32,
}

/// A chat completion about an image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCompletionRequest {
    pub system_prompt: String,
    pub initial_query: String,
    pub image_url: String,
    pub temperature: f32,
}

/// Trait for answer generation
///
/// Implementations:
/// - `AzureOpenAiProvider`: Azure OpenAI chat completions with an Azure Search data source
/// - `InMemoryProvider`: deterministic lookup tables for tests and offline use
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Answer a text query, with citations when retrieval is enabled
    async fn complete(&self, request: &CompletionRequest) -> Result<AugmentedAnswer>;

    /// Describe an image; returns the raw model text
    async fn complete_with_image(&self, request: &ImageCompletionRequest) -> Result<String>;

    /// Answer the follow-up query derived from the image at `image_url`
    async fn complete_follow_up(
        &self,
        image_url: &str,
        request: &CompletionRequest,
    ) -> Result<AugmentedAnswer> {
        let _ = image_url;
        self.complete(request).await
    }

    /// Get provider name for logging
    fn name(&self) -> &str;
}
