//! Configuration for the gateway

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Completion backend (azure or in_memory)
    #[serde(default)]
    pub backend: BackendProvider,
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Azure OpenAI configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Azure Search (retrieval source) configuration
    #[serde(default)]
    pub search: SearchConfig,
}

/// Backend provider selection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BackendProvider {
    /// Live Azure OpenAI deployment with Azure Search retrieval
    #[default]
    Azure,
    /// Deterministic in-memory answers (offline / testing)
    InMemory,
}

impl std::str::FromStr for BackendProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "azure" => Ok(Self::Azure),
            "in_memory" | "in-memory" | "memory" => Ok(Self::InMemory),
            other => Err(Error::Config(format!("Unknown backend: {}", other))),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum request body size in bytes (default: 1MB)
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Azure OpenAI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Resource endpoint, e.g. "https://my-resource.openai.azure.com"
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    /// Deployment (model) name
    #[serde(default)]
    pub deployment_name: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    "2024-02-01".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment_name: String::new(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Azure Search configuration for retrieval augmentation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub index_name: String,
}

impl GatewayConfig {
    /// Load configuration: defaults, then the TOML file (if given), then environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.from_env()
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&raw)
    }

    /// Parse TOML configuration text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid configuration: {}", e)))
    }

    /// Override with environment variables if present
    pub fn from_env(mut self) -> Result<Self> {
        if let Ok(val) = std::env::var("RAG_GATEWAY_BACKEND") {
            self.backend = val.parse()?;
        }
        if let Ok(val) = std::env::var("RAG_GATEWAY_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("RAG_GATEWAY_PORT") {
            self.server.port = val
                .parse()
                .map_err(|_| Error::Config(format!("Invalid RAG_GATEWAY_PORT: {}", val)))?;
        }

        if let Ok(val) = std::env::var("AZURE_OPENAI_ENDPOINT") {
            self.openai.endpoint = val;
        }
        if let Ok(val) = std::env::var("AZURE_OPENAI_KEY") {
            self.openai.api_key = val;
        }
        if let Ok(val) = std::env::var("AZURE_OPENAI_DEPLOYMENT") {
            self.openai.deployment_name = val;
        }
        if let Ok(val) = std::env::var("AZURE_OPENAI_API_VERSION") {
            self.openai.api_version = val;
        }

        if let Ok(val) = std::env::var("AZURE_SEARCH_ENDPOINT") {
            self.search.endpoint = val;
        }
        if let Ok(val) = std::env::var("AZURE_SEARCH_KEY") {
            self.search.api_key = val;
        }
        if let Ok(val) = std::env::var("AZURE_SEARCH_INDEX") {
            self.search.index_name = val;
        }

        Ok(self)
    }

    /// Check that the selected backend has everything it needs
    pub fn validate(&self) -> Result<()> {
        if self.backend != BackendProvider::Azure {
            return Ok(());
        }

        let openai = &self.openai;
        if [&openai.endpoint, &openai.api_key, &openai.deployment_name]
            .iter()
            .any(|v| v.trim().is_empty())
        {
            return Err(Error::Config(
                "Azure OpenAI configuration is incomplete (endpoint, api_key, deployment_name)"
                    .to_string(),
            ));
        }

        let search = &self.search;
        if [&search.endpoint, &search.api_key, &search.index_name]
            .iter()
            .any(|v| v.trim().is_empty())
        {
            return Err(Error::Config(
                "Azure Search configuration is incomplete (endpoint, api_key, index_name)"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
