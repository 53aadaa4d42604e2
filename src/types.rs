//! Core data types shared across the ingestion pipeline.

use serde::{Deserialize, Serialize};

/// Normalized record produced for every ingested transcript.
///
/// Created fresh per ingestion call; persistence is the host's job.
/// `fingerprint` depends only on content-semantic text, never on the
/// filename, capture date, or speaker-label spelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRecord {
    /// Canonical title, derived from the filename stem (max 80 chars).
    pub title: String,
    /// Inferred meeting date, ISO-8601 (`YYYY-MM-DD`).
    pub date: String,
    /// Canonical person IDs in first-seen order, no duplicates.
    pub attendees: Vec<String>,
    /// Verbatim decoded body text (trimmed).
    pub text: String,
    /// 64-hex-char SHA-256 digest over the sanitized text.
    pub fingerprint: String,
}

/// One person in the directory: a canonical identifier plus the name
/// variants it is recognized by. Alias matching is case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonEntry {
    /// Canonical identifier, e.g. "Valentin" or "Valya Dobrynin".
    pub name_en: String,
    /// Known name variants (any language, any case).
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Metadata handed to the tag classifier alongside the summary text.
#[derive(Debug, Clone, Default)]
pub struct TagMeta {
    pub title: String,
    /// Canonical person IDs, as produced by the attendee resolver.
    pub attendees: Vec<String>,
}
