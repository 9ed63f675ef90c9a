//! Session state machine coordinating the conversion pipeline.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::convert;
use crate::document::{DocumentInfo, IngestPolicy, RawDocument};
use crate::error::{ConversionError, IngotError, Result};
use crate::inference::InferenceService;
use crate::materialize::ConversionResult;
use crate::preview::{PreviewTable, parse_preview};

/// Lifecycle state of a conversion session.
///
/// There is no terminal failure state. A failed conversion lands back in
/// `Loaded` with the document and preview intact and the error attached,
/// so the user can retry without re-uploading; a failed ingestion lands
/// in `Empty` the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No document captured.
    Empty,
    /// A document and its preview are held; ready to convert.
    Loaded,
    /// A conversion request is in flight.
    Converting,
    /// A validated result is held alongside the document and preview.
    Converted,
}

/// How a conversion trigger ended, when it did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOutcome {
    /// The request completed, validated, and was stored.
    Completed(ConversionResult),
    /// Another request was already in flight; nothing changed.
    AlreadyConverting,
    /// The session was reset or re-ingested mid-flight, so the reply was
    /// dropped without touching state it no longer belongs to.
    Discarded,
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    document: Option<RawDocument>,
    preview: Option<PreviewTable>,
    result: Option<ConversionResult>,
    error: Option<ConversionError>,
    generation: u64,
}

impl SessionInner {
    fn new() -> Self {
        Self {
            state: SessionState::Empty,
            document: None,
            preview: None,
            result: None,
            error: None,
            generation: 0,
        }
    }

    /// Discard everything and advance the generation so any in-flight
    /// reply is recognized as stale.
    fn clear(&mut self) {
        self.state = SessionState::Empty;
        self.document = None;
        self.preview = None;
        self.result = None;
        self.error = None;
        self.generation += 1;
    }

    fn record_error(&mut self, error: &IngotError) {
        self.error = ConversionError::capture(error);
    }
}

/// Owns one conversion session and coordinates the pipeline around it.
///
/// Cloning yields another handle to the same session. Every trigger goes
/// through a short internal lock that is never held across a suspension
/// point, so one handle can reset while another is mid-convert.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionInner>>,
    service: Arc<dyn InferenceService>,
    policy: IngestPolicy,
}

impl Session {
    /// Create a session around an inference service.
    pub fn new(service: impl InferenceService + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner::new())),
            service: Arc::new(service),
            policy: IngestPolicy::default(),
        }
    }

    /// Replace the default file admission policy.
    pub fn with_policy(mut self, policy: IngestPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read a file through the admission policy and ingest it.
    ///
    /// Reading the file is the only suspension point; once the text is in
    /// memory, capture is synchronous and atomic.
    pub async fn ingest_file(&self, path: impl AsRef<Path>) -> Result<PreviewTable> {
        match RawDocument::load(path, &self.policy).await {
            Ok(document) => self.ingest(document),
            Err(error) => {
                let mut inner = self.lock();
                inner.clear();
                inner.record_error(&error);
                Err(error)
            }
        }
    }

    /// Capture a document and derive its preview.
    ///
    /// Ingestion is atomic: on success the previous document, preview,
    /// result, and error are replaced in one step; on failure nothing of
    /// the new document is kept and the session is emptied with the error
    /// attached. Either way the generation advances, so a conversion
    /// in flight for the previous document can never land here.
    pub fn ingest(&self, document: RawDocument) -> Result<PreviewTable> {
        match parse_preview(document.text()) {
            Ok(preview) => {
                let mut inner = self.lock();
                inner.state = SessionState::Loaded;
                inner.document = Some(document);
                inner.preview = Some(preview.clone());
                inner.result = None;
                inner.error = None;
                inner.generation += 1;
                info!(
                    generation = inner.generation,
                    rows = preview.len(),
                    "document ingested"
                );
                Ok(preview)
            }
            Err(error) => {
                let mut inner = self.lock();
                inner.clear();
                inner.record_error(&error);
                Err(error)
            }
        }
    }

    /// Send the captured document through the conversion pipeline.
    ///
    /// Single-flight: while a request is in flight, further triggers are
    /// no-ops returning [`ConvertOutcome::AlreadyConverting`]. A reply
    /// that arrives after the session was reset or re-ingested is
    /// discarded instead of applied. Converting again from `Converted`
    /// is allowed and clears the previous result first.
    ///
    /// Dropping the returned future mid-flight leaves the session in
    /// `Converting` until the next reset or ingestion.
    pub async fn convert(&self) -> Result<ConvertOutcome> {
        // Gate and capture under the lock, then release it for the await.
        let (raw_text, generation) = {
            let mut inner = self.lock();
            if inner.state == SessionState::Converting {
                debug!("conversion already in flight, ignoring trigger");
                return Ok(ConvertOutcome::AlreadyConverting);
            }

            let raw_text = match inner.document.as_ref() {
                Some(document) => document.text().to_string(),
                None => {
                    let error =
                        IngotError::Request("no document loaded to convert".to_string());
                    inner.record_error(&error);
                    return Err(error);
                }
            };

            inner.state = SessionState::Converting;
            inner.result = None;
            inner.error = None;
            (raw_text, inner.generation)
        };

        let outcome = convert::convert(&raw_text, self.service.as_ref()).await;

        let mut inner = self.lock();
        if inner.generation != generation || inner.state != SessionState::Converting {
            debug!(
                generation,
                current = inner.generation,
                "stale conversion reply discarded"
            );
            return Ok(ConvertOutcome::Discarded);
        }

        match outcome {
            Ok(result) => {
                inner.state = SessionState::Converted;
                inner.result = Some(result.clone());
                info!(generation, "conversion completed");
                Ok(ConvertOutcome::Completed(result))
            }
            Err(error) => {
                inner.state = SessionState::Loaded;
                inner.record_error(&error);
                debug!(generation, %error, "conversion failed");
                Err(error)
            }
        }
    }

    /// Discard the document, preview, result, and error.
    ///
    /// Does not cancel an in-flight request; its eventual reply fails the
    /// generation check and is dropped.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.clear();
        debug!(generation = inner.generation, "session reset");
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// The current preview, while a document is loaded.
    pub fn preview(&self) -> Option<PreviewTable> {
        self.lock().preview.clone()
    }

    /// The current result, while the last conversion stands.
    pub fn result(&self) -> Option<ConversionResult> {
        self.lock().result.clone()
    }

    /// The most recent failure, if one is attached.
    pub fn last_error(&self) -> Option<ConversionError> {
        self.lock().error.clone()
    }

    /// A point-in-time copy of everything user-visible in the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            state: inner.state,
            document: inner.document.as_ref().map(RawDocument::info),
            preview: inner.preview.clone(),
            result: inner.result.as_ref().map(|r| r.text().to_string()),
            error: inner.error.clone(),
            generation: inner.generation,
        }
    }
}

/// Serializable point-in-time view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Lifecycle state at capture time.
    pub state: SessionState,
    /// Metadata of the captured document, without its text.
    pub document: Option<DocumentInfo>,
    /// The bounded preview.
    pub preview: Option<PreviewTable>,
    /// Canonical result text, when converted.
    pub result: Option<String>,
    /// Attached failure, when present.
    pub error: Option<ConversionError>,
    /// Generation token at capture time.
    pub generation: u64,
}
