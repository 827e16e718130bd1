//! rag-gateway: retrieval-augmented chat gateway
//!
//! Validates chat requests, runs them against a pluggable completion
//! provider (Azure OpenAI with an Azure Search data source, or an in-memory
//! stand-in) and returns answers with the citations the backend reported.
//! Image queries are chained: the image description feeds a templated,
//! retrieval-augmented follow-up question.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod providers;
pub mod server;
pub mod types;
pub mod validation;

pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use orchestrator::ChatOrchestrator;
pub use providers::{AzureOpenAiProvider, CompletionProvider, InMemoryProvider};
pub use types::{
    query::{ImageQuery, TextQuery},
    response::{AugmentedAnswer, Citation, ImageFollowUpResult},
};
pub use validation::{validate_image, validate_text, ValidationOutcome};
