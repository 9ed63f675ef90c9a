//! Validation and canonical materialization of inference replies.

use std::path::Path;

use serde_json::Value;

use crate::error::{IngotError, Result};

/// File name suggested for the downloadable artifact.
pub const ARTIFACT_FILE_NAME: &str = "converted_data.json";

/// MIME type of the downloadable artifact.
pub const ARTIFACT_MEDIA_TYPE: &str = "application/json";

/// Validate a raw reply as JSON and fix its canonical text form.
///
/// The reply is parsed strictly after trimming surrounding whitespace.
/// Anything that is not JSON, including an empty reply, is a
/// response-validation failure; raw text is never passed downstream as if
/// it were a result. On success the value is re-serialized with 2-space
/// indentation and object keys in arrival order, which makes the operation
/// idempotent: materializing a result's own text reproduces it byte for
/// byte.
pub fn materialize(raw: &str) -> Result<ConversionResult> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IngotError::ResponseValidation(
            "the service returned empty text".to_string(),
        ));
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| IngotError::ResponseValidation(e.to_string()))?;

    let text = serde_json::to_string_pretty(&value)
        .map_err(|e| IngotError::ResponseValidation(e.to_string()))?;

    Ok(ConversionResult { text })
}

/// A validated conversion result in its canonical serialized form.
///
/// Constructed only by [`materialize`], so holding one is proof the text
/// parsed as JSON. Every sink reads the same canonical text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    text: String,
}

impl ConversionResult {
    /// The canonical pretty-printed JSON text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bytes for clipboard placement: the canonical text, verbatim.
    pub fn clipboard_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// The downloadable artifact carrying the same bytes.
    pub fn download(&self) -> DownloadArtifact {
        DownloadArtifact {
            file_name: ARTIFACT_FILE_NAME.to_string(),
            media_type: ARTIFACT_MEDIA_TYPE.to_string(),
            bytes: self.text.clone().into_bytes(),
        }
    }
}

/// A named, typed byte payload ready for a download-style sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type of the payload.
    pub media_type: String,
    /// The payload: UTF-8 JSON text.
    pub bytes: Vec<u8>,
}

impl DownloadArtifact {
    /// Write the payload to a file.
    ///
    /// Failures surface as plain IO errors and never touch session state;
    /// a failed download leaves the finished conversion intact.
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}
