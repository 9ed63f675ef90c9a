//! Inference service integration: the provider seam and its implementations.
//!
//! The conversion pipeline never inspects cell values itself. Type-aware
//! structuring is delegated wholesale to whatever sits behind
//! [`InferenceService`]:
//!
//! - [`GeminiService`]: Google Gemini, reads `GEMINI_API_KEY`, supports
//!   JSON-constrained replies
//! - [`AnthropicService`]: Anthropic Claude, reads `ANTHROPIC_API_KEY`
//! - [`MockService`]: canned replies and call recording for tests

mod anthropic;
mod gemini;
mod mock;
mod prompt;
mod service;

pub use anthropic::AnthropicService;
pub use gemini::GeminiService;
pub use mock::{MockService, RecordedCall};
pub use prompt::build_prompt;
pub use service::{GenerateOptions, InferenceService, ServiceConfig};
