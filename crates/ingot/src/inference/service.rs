//! The provider seam: one prompt in, one text reply out.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Per-call options for an inference request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Ask the provider to constrain its reply to JSON, where the transport
    /// supports it. Providers without such a switch ignore this; the
    /// instruction text carries the same requirement either way.
    pub json_output: bool,
}

/// Configuration shared by inference providers.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Model identifier, provider-specific.
    pub model: String,
    /// Maximum tokens in the reply.
    pub max_tokens: usize,
    /// Sampling temperature. Conversion wants faithful transcription, so
    /// the default is zero.
    pub temperature: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            max_tokens: 8192,
            temperature: 0.0,
        }
    }
}

/// A capability that turns one instruction prompt into one text reply.
///
/// This is the seam the conversion pipeline hangs on: anything that accepts
/// a natural-language instruction and returns text slots in behind it, be
/// it a hosted LLM, a local model, or a scripted double. Implementations
/// must be thread-safe so a session can share one across triggers.
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Send one prompt and return the provider's reply text verbatim.
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String>;

    /// Short provider name for logs and display.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: InferenceService + ?Sized> InferenceService for Arc<T> {
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        (**self).generate(prompt, options).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
