//! Application state for the gateway server

use std::sync::Arc;

use crate::config::{BackendProvider, GatewayConfig};
use crate::error::Result;
use crate::orchestrator::ChatOrchestrator;
use crate::providers::{AzureOpenAiProvider, CompletionProvider, InMemoryProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: GatewayConfig,
    /// Completion provider (Azure OpenAI or in-memory)
    provider: Arc<dyn CompletionProvider>,
    /// Orchestrator over the provider
    orchestrator: ChatOrchestrator,
}

impl AppState {
    /// Create application state, building the provider the config selects
    pub fn new(config: GatewayConfig) -> Result<Self> {
        tracing::info!("Initializing gateway state (backend: {:?})...", config.backend);

        let provider: Arc<dyn CompletionProvider> = match config.backend {
            BackendProvider::Azure => {
                config.validate()?;
                tracing::info!(
                    "Using Azure OpenAI deployment '{}' with search index '{}'",
                    config.openai.deployment_name,
                    config.search.index_name
                );
                Arc::new(AzureOpenAiProvider::new(&config.openai, &config.search)?)
            }
            BackendProvider::InMemory => {
                tracing::info!("Using in-memory backend (simulated answers)");
                Arc::new(InMemoryProvider::new())
            }
        };

        Ok(Self::with_provider(config, provider))
    }

    /// Create application state around an existing provider
    pub fn with_provider(config: GatewayConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        let orchestrator = ChatOrchestrator::new(Arc::clone(&provider));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                provider,
                orchestrator,
            }),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.inner.provider
    }

    pub fn orchestrator(&self) -> &ChatOrchestrator {
        &self.inner.orchestrator
    }
}
