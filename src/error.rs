//! Error types for transcript ingestion.
//!
//! The core is deliberately total: malformed or empty input, a missing
//! dictionary file, or a corrupted dictionary all degrade to a defined empty
//! output rather than an error. The one failure class that must reach the
//! caller is candidate-store persistence: losing learned name candidates
//! degrades future attendee resolution with no visible symptom otherwise.

use std::path::PathBuf;
use thiserror::Error;

/// Error types surfaced by the ingestion core.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to write candidate store {path}: {message}")]
    CandidateStoreWrite { path: PathBuf, message: String },
}

impl IngestError {
    /// Returns true if retrying the operation may succeed (storage contention,
    /// transient filesystem errors). Retry policy belongs to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IngestError::CandidateStoreWrite { .. })
    }
}
