//! Deterministic inference service for tests and offline runs.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{IngotError, Result};

use super::service::{GenerateOptions, InferenceService};

/// Scripted reply for a [`MockService`].
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Failure(String),
}

/// Inference double that returns a canned reply and records what it was
/// asked, so tests can assert on prompts and options without a network.
pub struct MockService {
    reply: Reply,
    calls: Mutex<Vec<RecordedCall>>,
}

/// One recorded `generate` invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The full prompt text.
    pub prompt: String,
    /// Whether a JSON-constrained reply was requested.
    pub json_output: bool,
}

impl MockService {
    /// A service that replies with an empty JSON array.
    pub fn new() -> Self {
        Self::returning("[]")
    }

    /// A service that replies with the given text on every call.
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A service whose every call fails with a request error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Reply::Failure(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All calls recorded so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of `generate` invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceService for MockService {
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                prompt: prompt.to_string(),
                json_output: options.json_output,
            });

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Failure(message) => Err(IngotError::Request(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
