//! ClaudeApiGateway - Direct REST API implementation of [`CompletionGateway`].
//!
//! Configuration priority: ~/.config/compass/secret.json > environment variables

use async_trait::async_trait;
use compass_core::config::CompassConfig;
use compass_core::error::{CompassError, Result};
use compass_core::gateway::{ChatMessage, CompletionGateway};
use compass_infrastructure::storage::SecretStorage;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Gateway that talks to the Claude Messages API.
///
/// One HTTP request per call, no retries. The caller decides what a failure
/// means for the conversation.
#[derive(Clone)]
pub struct ClaudeApiGateway {
    client: Client,
    api_key: String,
    model: String,
    api_url: String,
    anthropic_version: String,
}

impl ClaudeApiGateway {
    /// Creates a gateway with default endpoint settings.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let config = CompassConfig {
            model: model.into(),
            ..CompassConfig::default()
        };
        Self::from_config(&config, api_key)
    }

    /// Creates a gateway from the application config.
    ///
    /// Falls back to a client without timeout if the configured client
    /// cannot be built.
    pub fn from_config(config: &CompassConfig, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!("Failed to build HTTP client with timeout: {err}");
                Client::new()
            });

        Self {
            client,
            api_key: api_key.into(),
            model: config.model.clone(),
            api_url: config.api_url.clone(),
            anthropic_version: config.anthropic_version.clone(),
        }
    }

    /// Resolves the API key and builds a gateway.
    ///
    /// Priority:
    /// 1. ~/.config/compass/secret.json (`claude.api_key`, optional `claude.model_name`)
    /// 2. Environment variables (ANTHROPIC_API_KEY, CLAUDE_MODEL_NAME)
    ///
    /// The model falls back to `config.model` when neither source names one.
    /// A secret.json that exists but is malformed is an error rather than a
    /// silent fall-through to the environment.
    pub fn try_from_env(config: &CompassConfig) -> Result<Self> {
        let credentials = match SecretStorage::new() {
            Ok(storage) => storage.claude_credentials()?,
            Err(err) => {
                tracing::debug!("secret.json not used: {err}");
                None
            }
        };
        if let Some(claude) = credentials {
            let gateway = Self::from_config(config, claude.api_key);
            return Ok(match claude.model_name {
                Some(model) => gateway.with_model(model),
                None => gateway,
            });
        }

        let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| {
            CompassError::config(
                "ANTHROPIC_API_KEY not found in ~/.config/compass/secret.json or environment variables",
            )
        })?;

        let gateway = Self::from_config(config, api_key);
        Ok(match env::var("CLAUDE_MODEL_NAME") {
            Ok(model) => gateway.with_model(model),
            Err(_) => gateway,
        })
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the endpoint after construction.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &CreateMessageRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.anthropic_version)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| CompassError::network(format!("Claude API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Claude error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: CreateMessageResponse = response.json().await.map_err(|err| {
            CompassError::network(format!("Failed to decode Claude response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CompletionGateway for ClaudeApiGateway {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String> {
        let request = CreateMessageRequest {
            model: &self.model,
            max_tokens,
            system: system_prompt,
            messages: history
                .iter()
                .map(|message| Message {
                    role: message.role.as_str(),
                    content: &message.content,
                })
                .collect(),
        };

        tracing::debug!(
            "Claude request: model={}, messages={}, max_tokens={}",
            self.model,
            request.messages.len(),
            max_tokens
        );

        let text = self.send_request(&request).await?;
        tracing::debug!("Claude response: {} chars", text.len());
        Ok(text)
    }
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CreateMessageResponse {
    #[serde(default)]
    content: Vec<ContentBlockResponse>,
}

/// Segments of any type are accepted; only `text` segments contribute.
#[derive(Deserialize)]
struct ContentBlockResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: CreateMessageResponse) -> Result<String> {
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if text.trim().is_empty() {
        return Err(CompassError::EmptyResponse);
    }
    Ok(text)
}

fn map_http_error(status: StatusCode, body: &str) -> CompassError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    CompassError::http(status.as_u16(), message)
}
