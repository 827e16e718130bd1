//! Azure OpenAI chat completions with an Azure Search retrieval data source

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{OpenAiConfig, SearchConfig};
use crate::error::{Error, Result};
use crate::types::{AugmentedAnswer, Citation};

use super::completion::{CompletionProvider, CompletionRequest, ImageCompletionRequest};

/// Live provider backed by an Azure OpenAI deployment
pub struct AzureOpenAiProvider {
    http: Client,
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
    /// Attached to every request that asks for retrieval
    data_source: DataSource,
}

impl AzureOpenAiProvider {
    /// Create a new provider
    ///
    /// # Arguments
    /// * `openai` - endpoint, key and deployment of the completion backend
    /// * `search` - retrieval index attached when a request asks for retrieval
    pub fn new(openai: &OpenAiConfig, search: &SearchConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(openai.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: openai.endpoint.trim_end_matches('/').to_string(),
            api_key: openai.api_key.clone(),
            deployment: openai.deployment_name.clone(),
            api_version: openai.api_version.clone(),
            data_source: DataSource::azure_search(search),
        })
    }

    /// Get the chat completions URL for the configured deployment
    fn endpoint(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }

    fn build_body(&self, messages: Vec<Message>, use_retrieval: bool, temperature: f32) -> ChatRequest {
        ChatRequest {
            messages,
            temperature,
            data_sources: use_retrieval.then(|| vec![self.data_source.clone()]),
        }
    }

    async fn send(&self, body: &ChatRequest) -> Result<ResponseMessage> {
        let response = self
            .http
            .post(self.endpoint())
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(e.to_string())
                } else {
                    Error::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(format!("Failed to parse completion response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| Error::provider("No choices in completion response"))
    }
}

/// Map a non-success backend status onto the error taxonomy
fn status_error(status: StatusCode, body: &str) -> Error {
    match status {
        StatusCode::BAD_REQUEST => Error::invalid_argument(backend_message(body)),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(backend_message(body)),
        StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED => {
            Error::Unsupported(backend_message(body))
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Error::Timeout(backend_message(body)),
        _ => Error::provider(format!("Completion failed ({}): {}", status, body)),
    }
}

/// Pull `error.message` out of a backend error body, falling back to the raw body
fn backend_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .unwrap_or_else(|| body.to_string())
}

#[derive(Serialize)]
struct ChatRequest {
    messages: Vec<Message>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_sources: Option<Vec<DataSource>>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: MessageContent,
}

impl Message {
    fn system(text: &str) -> Self {
        Self {
            role: "system",
            content: MessageContent::Text(text.to_string()),
        }
    }

    fn user(text: &str) -> Self {
        Self {
            role: "user",
            content: MessageContent::Text(text.to_string()),
        }
    }

    fn user_with_image(text: &str, image_url: &str) -> Self {
        Self {
            role: "user",
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: text.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.to_string(),
                        detail: "low",
                    },
                },
            ]),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct DataSource {
    #[serde(rename = "type")]
    kind: &'static str,
    parameters: SearchParameters,
}

impl DataSource {
    fn azure_search(search: &SearchConfig) -> Self {
        Self {
            kind: "azure_search",
            parameters: SearchParameters {
                endpoint: search.endpoint.clone(),
                index_name: search.index_name.clone(),
                authentication: SearchAuthentication {
                    kind: "api_key",
                    key: search.api_key.clone(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct SearchParameters {
    endpoint: String,
    index_name: String,
    authentication: SearchAuthentication,
}

#[derive(Debug, Clone, Serialize)]
struct SearchAuthentication {
    #[serde(rename = "type")]
    kind: &'static str,
    key: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    /// Extension metadata; present when a data source was attached
    #[serde(default)]
    context: Option<MessageContext>,
}

impl ResponseMessage {
    fn into_answer(self) -> AugmentedAnswer {
        let citations = self
            .context
            .and_then(|c| c.citations)
            .unwrap_or_default()
            .into_iter()
            .map(|c| Citation::new(c.title.unwrap_or_default(), c.url.unwrap_or_default()))
            .collect();

        AugmentedAnswer::new(self.content.unwrap_or_default(), citations)
    }
}

#[derive(Deserialize)]
struct MessageContext {
    #[serde(default)]
    citations: Option<Vec<RawCitation>>,
}

#[derive(Deserialize)]
struct RawCitation {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
impl CompletionProvider for AzureOpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<AugmentedAnswer> {
        tracing::debug!(
            "Azure completion: retrieval={}, temperature={}",
            request.use_retrieval,
            request.temperature
        );

        let body = self.build_body(
            vec![
                Message::system(&request.system_prompt),
                Message::user(&request.user_query),
            ],
            request.use_retrieval,
            request.temperature,
        );

        let message = self.send(&body).await?;
        Ok(message.into_answer())
    }

    async fn complete_with_image(&self, request: &ImageCompletionRequest) -> Result<String> {
        tracing::debug!("Azure image completion: image={}", request.image_url);

        let body = self.build_body(
            vec![
                Message::system(&request.system_prompt),
                Message::user_with_image(&request.initial_query, &request.image_url),
            ],
            false,
            request.temperature,
        );

        let message = self.send(&body).await?;
        Ok(message.content.unwrap_or_default())
    }

    fn name(&self) -> &str {
        "azure-openai"
    }
}
