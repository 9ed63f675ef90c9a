//! Google Gemini inference provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngotError, Result};

use super::service::{GenerateOptions, InferenceService, ServiceConfig};

/// Gemini generateContent endpoint root.
const API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// MIME type requested when a JSON-constrained reply is asked for.
const JSON_MIME_TYPE: &str = "application/json";

/// Google Gemini inference provider.
///
/// Honors [`GenerateOptions::json_output`] through the API's
/// `responseMimeType` switch, which keeps replies bare JSON without
/// relying on the instruction text alone.
pub struct GeminiService {
    client: Client,
    api_key: String,
    config: ServiceConfig,
}

impl GeminiService {
    /// Create a provider with the default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ServiceConfig::default())
    }

    /// Create a provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| IngotError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create a provider from the `GEMINI_API_KEY` environment variable.
    ///
    /// A missing key is a configuration error: the provider refuses to
    /// start rather than failing later on the first request.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            IngotError::Config("GEMINI_API_KEY environment variable not set".to_string())
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
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| IngotError::Config(format!("invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    fn request_body(&self, prompt: &str, options: &GenerateOptions) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
                response_mime_type: options
                    .json_output
                    .then(|| JSON_MIME_TYPE.to_string()),
            },
        }
    }
}

#[async_trait]
impl InferenceService for GeminiService {
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        let url = format!("{}/{}:generateContent", API_URL, self.config.model);
        let body = self.request_body(prompt, options);

        debug!(
            model = %self.config.model,
            json_output = options.json_output,
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| IngotError::Request(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(IngotError::Request(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| IngotError::Request(format!("failed to parse Gemini response: {}", e)))?;

        extract_text(api_response)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Pull the reply text out of the response envelope.
fn extract_text(response: GeminiResponse) -> Result<String> {
    response
        .candidates
        .into_iter()
        .next()
        .map(|candidate| {
            candidate
                .content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.is_empty())
        .ok_or_else(|| IngotError::Request("Gemini response contained no text".to_string()))
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: usize,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let service = GeminiService::new("test-key").unwrap();
        assert_eq!(service.name(), "gemini");
        assert_eq!(service.config().model, "gemini-2.5-flash");
    }

    #[test]
    fn test_with_model_overrides_config() {
        let service = GeminiService::new("test-key")
            .unwrap()
            .with_model("gemini-2.5-pro");
        assert_eq!(service.config().model, "gemini-2.5-pro");
    }

    #[test]
    fn test_build_headers_rejects_invalid_key() {
        let service = GeminiService::new("bad\nkey").unwrap();
        let err = service.build_headers().unwrap_err();
        assert!(matches!(err, IngotError::Config(_)));
    }

    #[test]
    fn test_json_output_sets_response_mime_type() {
        let service = GeminiService::new("test-key").unwrap();

        let plain = service.request_body("hi", &GenerateOptions::default());
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json["generationConfig"].get("responseMimeType").is_none());

        let constrained = service.request_body("hi", &GenerateOptions { json_output: true });
        let json = serde_json::to_value(&constrained).unwrap();
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn test_extract_text_from_response_envelope() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "[{\"a\": 1}]"}]}}
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(response).unwrap(), "[{\"a\": 1}]");
    }

    #[test]
    fn test_extract_text_joins_multiple_parts() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "[1,"}, {"text": "2]"}]}}
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(response).unwrap(), "[1,2]");
    }

    #[test]
    fn test_empty_response_is_a_request_error() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        let err = extract_text(response).unwrap_err();
        assert!(matches!(err, IngotError::Request(_)));
    }
}
