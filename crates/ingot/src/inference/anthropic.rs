//! Anthropic Claude inference provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{IngotError, Result};

use super::service::{GenerateOptions, InferenceService, ServiceConfig};

/// Anthropic API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version header value.
const API_VERSION: &str = "2023-06-01";

/// Model used when the configuration does not name one.
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Anthropic Claude inference provider.
///
/// The messages API has no JSON-constrained output switch, so
/// [`GenerateOptions::json_output`] is accepted and ignored here; the
/// instruction text carries the bare-array requirement and the
/// orchestrator strips a stray code fence.
pub struct AnthropicService {
    client: Client,
    api_key: String,
    config: ServiceConfig,
}

impl AnthropicService {
    /// Create a provider with the default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let config = ServiceConfig {
            model: DEFAULT_MODEL.to_string(),
            ..ServiceConfig::default()
        };
        Self::with_config(api_key, config)
    }

    /// Create a provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| IngotError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create a provider from the `ANTHROPIC_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            IngotError::Config("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Replace the configured model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| IngotError::Config(format!("invalid API key: {}", e)))?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl InferenceService for AnthropicService {
    async fn generate(&self, prompt: &str, _options: &GenerateOptions) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        debug!(model = %self.config.model, "sending messages request");

        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| IngotError::Request(format!("Anthropic request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(IngotError::Request(format!(
                "Anthropic API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            IngotError::Request(format!("failed to parse Anthropic response: {}", e))
        })?;

        extract_text(api_response)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Pull the first text block out of the response envelope.
fn extract_text(response: ApiResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find(|block| block.content_type == "text")
        .map(|block| block.text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| IngotError::Request("Anthropic response contained no text".to_string()))
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}
