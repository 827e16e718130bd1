//! Completion provider abstraction
//!
//! The orchestrator only sees [`CompletionProvider`]. Which implementation
//! backs it is decided once, at startup, from configuration.

pub mod azure;
pub mod completion;
pub mod in_memory;

pub use azure::AzureOpenAiProvider;
pub use completion::{CompletionProvider, CompletionRequest, ImageCompletionRequest};
pub use in_memory::InMemoryProvider;
