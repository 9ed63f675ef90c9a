//! Raw document capture and the file ingestion boundary.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{IngotError, Result};

/// Admission policy for the file ingestion boundary.
///
/// The check is extension-based and advisory, not a security boundary: the
/// default admits only `.csv`, while callers that accept anything delimited
/// can use [`IngestPolicy::admit_all`] and let the preview speak for itself.
#[derive(Debug, Clone)]
pub struct IngestPolicy {
    /// Accepted file extensions, compared case-insensitively.
    /// An empty list admits every file.
    pub allowed_extensions: Vec<String>,
}

impl Default for IngestPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["csv".to_string()],
        }
    }
}

impl IngestPolicy {
    /// Policy that admits every file regardless of extension.
    pub fn admit_all() -> Self {
        Self {
            allowed_extensions: Vec::new(),
        }
    }

    /// Whether the policy admits the given path.
    pub fn admits(&self, path: &Path) -> bool {
        if self.allowed_extensions.is_empty() {
            return true;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

/// An ingested document: the verbatim text plus capture metadata.
///
/// Immutable once captured. A session replaces it wholesale on re-ingestion
/// or reset; nothing downstream ever edits the text.
#[derive(Debug, Clone)]
pub struct RawDocument {
    name: Option<String>,
    text: String,
    hash: String,
    size_bytes: u64,
    ingested_at: DateTime<Utc>,
}

impl RawDocument {
    /// Capture a document from already-decoded text.
    pub fn new(name: Option<String>, text: impl Into<String>) -> Self {
        let text = text.into();

        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let hash = format!("sha256:{:x}", hasher.finalize());

        Self {
            name,
            size_bytes: text.len() as u64,
            hash,
            text,
            ingested_at: Utc::now(),
        }
    }

    /// Read and decode a file as UTF-8, honoring the admission policy.
    ///
    /// A rejected or undecodable file yields a [`IngotError::Read`] with the
    /// offending path; nothing is captured in that case.
    pub async fn load(path: impl AsRef<Path>, policy: &IngestPolicy) -> Result<Self> {
        let path = path.as_ref();

        if !policy.admits(path) {
            return Err(IngotError::Read {
                path: path.to_path_buf(),
                message: format!(
                    "file type not accepted (allowed: {})",
                    policy.allowed_extensions.join(", ")
                ),
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| IngotError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let text = String::from_utf8(bytes).map_err(|e| IngotError::Read {
            path: path.to_path_buf(),
            message: format!("not valid UTF-8 text: {}", e),
        })?;

        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Ok(Self::new(name, text))
    }

    /// Display name, when the document came from a named source.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The verbatim document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Capture metadata without the text payload.
    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            name: self.name.clone(),
            hash: self.hash.clone(),
            size_bytes: self.size_bytes,
            ingested_at: self.ingested_at,
        }
    }
}

/// Metadata view of a captured document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Display name, if any.
    pub name: Option<String>,
    /// SHA-256 of the document text.
    pub hash: String,
    /// Size of the text in bytes.
    pub size_bytes: u64,
    /// When the document was captured.
    pub ingested_at: DateTime<Utc>,
}
