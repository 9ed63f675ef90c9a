//! Error types for the ingot library.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ingot operations.
#[derive(Debug, Error)]
pub enum IngotError {
    /// The source file could not be read or decoded as UTF-8 text.
    #[error("failed to read '{path}': {message}")]
    Read { path: PathBuf, message: String },

    /// The bounded preview could not be built.
    #[error("preview parse failed: {0}")]
    PreviewParse(String),

    /// The inference call itself failed (network, auth, quota, bad route).
    #[error("inference request failed: {0}")]
    Request(String),

    /// The inference service replied, but not with valid JSON.
    #[error("inference response is not valid JSON: {0}")]
    ResponseValidation(String),

    /// Startup configuration problem (missing API key, bad client setup).
    #[error("configuration error: {0}")]
    Config(String),
}

/// The pipeline phase an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPhase {
    /// Reading or decoding the source file.
    Read,
    /// Building the bounded preview.
    PreviewParse,
    /// Calling the inference service.
    Request,
    /// Validating the inference service's reply.
    ResponseValidation,
}

impl IngotError {
    /// The phase this error belongs to, if it is session-scoped.
    ///
    /// `Config` errors are fatal at startup and never attach to a session,
    /// so they carry no phase.
    pub fn phase(&self) -> Option<ErrorPhase> {
        match self {
            IngotError::Read { .. } => Some(ErrorPhase::Read),
            IngotError::PreviewParse(_) => Some(ErrorPhase::PreviewParse),
            IngotError::Request(_) => Some(ErrorPhase::Request),
            IngotError::ResponseValidation(_) => Some(ErrorPhase::ResponseValidation),
            IngotError::Config(_) => None,
        }
    }
}

/// Session-scoped record of the most recent failure.
///
/// Cleared by the next successful operation or an explicit reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionError {
    /// Where in the pipeline the failure happened.
    pub phase: ErrorPhase,
    /// Human-readable description, shown to the user verbatim.
    pub message: String,
}

impl ConversionError {
    /// Capture an error for session storage.
    ///
    /// Returns `None` for errors without a phase (startup configuration),
    /// which must never be attached to a session.
    pub fn capture(error: &IngotError) -> Option<Self> {
        error.phase().map(|phase| Self {
            phase,
            message: error.to_string(),
        })
    }
}

/// Result type alias for ingot operations.
pub type Result<T> = std::result::Result<T, IngotError>;
