//! Query request types

use serde::{Deserialize, Serialize};

/// Default system prompt when the caller supplies none
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Lowest temperature the backend accepts
pub const MIN_TEMPERATURE: f32 = 0.0;

/// Highest temperature the backend accepts
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Slot in a follow-up template that receives the image description
pub const FOLLOW_UP_SLOT: &str = "{0}";

/// Text query, optionally grounded in the retrieval index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextQuery {
    /// System prompt that frames the conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// The user's question
    #[serde(default)]
    pub user_query: String,

    /// Attach the retrieval data source (default: true)
    #[serde(default = "default_use_retrieval", alias = "useRAG", alias = "useRag")]
    pub use_retrieval: bool,

    /// Sampling temperature, 0.0-2.0 (default: 0.2)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Image query whose description feeds a retrieval-augmented follow-up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageQuery {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Question asked about the image itself
    #[serde(default = "default_initial_image_query")]
    pub initial_image_query: String,

    /// Absolute URL of the image
    #[serde(default)]
    pub image_url: String,

    /// Follow-up question; `{0}` is replaced by the image description
    #[serde(default = "default_follow_up_template")]
    pub follow_up_template: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_use_retrieval() -> bool {
    true
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_initial_image_query() -> String {
    "What is shown in this image?".to_string()
}

fn default_follow_up_template() -> String {
    "Tell me more about: {0}".to_string()
}

impl Default for TextQuery {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            user_query: String::new(),
            use_retrieval: true,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl TextQuery {
    /// Create a new query
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            ..Default::default()
        }
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Enable or disable retrieval augmentation
    pub fn with_retrieval(mut self, use_retrieval: bool) -> Self {
        self.use_retrieval = use_retrieval;
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Default for ImageQuery {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            initial_image_query: default_initial_image_query(),
            image_url: String::new(),
            follow_up_template: default_follow_up_template(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl ImageQuery {
    /// Create a new image query with default prompts
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            ..Default::default()
        }
    }

    /// Set the question asked about the image
    pub fn with_initial_query(mut self, query: impl Into<String>) -> Self {
        self.initial_image_query = query.into();
        self
    }

    /// Set the follow-up template
    pub fn with_follow_up_template(mut self, template: impl Into<String>) -> Self {
        self.follow_up_template = template.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Clamp a temperature into the range the backend accepts
///
/// NaN collapses to the default temperature.
pub fn clamp_temperature(temperature: f32) -> f32 {
    if temperature.is_nan() {
        return DEFAULT_TEMPERATURE;
    }
    temperature.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_query_defaults_from_json() {
        let query: TextQuery = serde_json::from_str(r#"{"userQuery":"hi"}"#).unwrap();
        assert_eq!(query.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(query.user_query, "hi");
        assert!(query.use_retrieval);
        assert_eq!(query.temperature, 0.2);
    }

    #[test]
    fn test_text_query_accepts_use_rag_alias() {
        let query: TextQuery =
            serde_json::from_str(r#"{"userQuery":"hi","useRAG":false}"#).unwrap();
        assert!(!query.use_retrieval);
    }

    #[test]
    fn test_image_query_defaults_from_json() {
        let query: ImageQuery =
            serde_json::from_str(r#"{"imageUrl":"https://example.com/x.png"}"#).unwrap();
        assert_eq!(query.initial_image_query, "What is shown in this image?");
        assert_eq!(query.follow_up_template, "Tell me more about: {0}");
        assert_eq!(query.temperature, 0.2);
    }

    #[test]
    fn test_clamp_temperature() {
        assert_eq!(clamp_temperature(-0.5), 0.0);
        assert_eq!(clamp_temperature(3.0), 2.0);
        assert_eq!(clamp_temperature(0.7), 0.7);
        assert_eq!(clamp_temperature(f32::NAN), DEFAULT_TEMPERATURE);
    }
}
