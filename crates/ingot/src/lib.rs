//! Ingot: LLM-assisted conversion of delimited text into typed JSON.
//!
//! A session captures a raw CSV document, derives a bounded preview of its
//! first records, and on request hands the verbatim text to an inference
//! service that returns the data as a JSON array with scalar types
//! restored: numbers and booleans instead of quoted text. The reply is
//! validated and fixed into one canonical pretty-printed form that feeds
//! the copy and download sinks.
//!
//! # Core Principles
//!
//! - **Delegated typing**: the pipeline never inspects cell values; type
//!   coercion is the inference service's contract, requested through the
//!   instruction prompt
//! - **Advisory preview**: the bounded preview is a best-effort glance at
//!   the first records, never the canonical parse
//! - **Single-flight**: one conversion request per session at a time, and
//!   a reply that outlives its session generation is discarded
//!
//! # Example
//!
//! ```no_run
//! use ingot::{MockService, Session};
//!
//! # async fn demo() -> ingot::Result<()> {
//! let session = Session::new(MockService::returning(r#"[{"a": 1, "b": true}]"#));
//!
//! let preview = session.ingest_file("report.csv").await?;
//! println!("previewing {} rows", preview.len());
//!
//! session.convert().await?;
//! if let Some(result) = session.result() {
//!     println!("{}", result.text());
//! }
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod inference;
pub mod session;

mod convert;
mod materialize;
mod preview;

pub use convert::convert;
pub use document::{DocumentInfo, IngestPolicy, RawDocument};
pub use error::{ConversionError, ErrorPhase, IngotError, Result};
pub use inference::{
    AnthropicService, GeminiService, GenerateOptions, InferenceService, MockService,
    ServiceConfig,
};
pub use materialize::{
    ARTIFACT_FILE_NAME, ARTIFACT_MEDIA_TYPE, ConversionResult, DownloadArtifact, materialize,
};
pub use preview::{PREVIEW_ROW_LIMIT, PreviewRow, PreviewTable, parse_preview};
pub use session::{ConvertOutcome, Session, SessionSnapshot, SessionState};
