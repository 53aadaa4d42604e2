//! End-to-end ingestion of a single decoded transcript.
//!
//! The caller hands over flat text and the source filename; this module
//! runs the fingerprint, date inference, and attendee resolution stages
//! and assembles the per-call [`TranscriptRecord`]. Candidate-store write
//! failures are the only error that propagates.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::IngestError;
use crate::fingerprint::{fingerprint, short_fingerprint};
use crate::people::{resolve_and_learn, CandidateStore, PersonDirectory};
use crate::types::TranscriptRecord;

const TITLE_MAX_CHARS: usize = 80;

/// Ingest one transcript against today's UTC date.
pub fn run(
    text: &str,
    filename: &str,
    directory: &PersonDirectory,
    stopwords: &HashSet<String>,
    store: &mut dyn CandidateStore,
) -> Result<TranscriptRecord, IngestError> {
    run_at(
        text,
        filename,
        directory,
        stopwords,
        store,
        chrono::Utc::now().date_naive(),
    )
}

/// Same as [`run`] with an injected "today" for date inference.
pub fn run_at(
    text: &str,
    filename: &str,
    directory: &PersonDirectory,
    stopwords: &HashSet<String>,
    store: &mut dyn CandidateStore,
    today: NaiveDate,
) -> Result<TranscriptRecord, IngestError> {
    let body = text.trim();
    let title = derive_title(filename);
    let date = crate::dates::infer_meeting_date_at(filename, body, today);
    let digest = fingerprint(body);
    let attendees = resolve_and_learn(body, directory, stopwords, store, None)?;

    log::info!(
        "Ingested '{}' date={} attendees={} fp={}",
        title,
        date,
        attendees.len(),
        short_fingerprint(body, 8)
    );

    Ok(TranscriptRecord {
        title,
        date,
        attendees,
        text: body.to_string(),
        fingerprint: digest,
    })
}

fn derive_title(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .trim();
    let base = if stem.is_empty() { "Meeting" } else { stem };
    base.chars().take(TITLE_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::people::MemoryCandidateStore;
    use crate::types::PersonEntry;

    fn directory() -> PersonDirectory {
        PersonDirectory::from_entries(vec![PersonEntry {
            name_en: "Valentin".to_string(),
            aliases: vec!["Валентин".to_string(), "Валя".to_string()],
        }])
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_run_assembles_record() {
        let dir = directory();
        let stops = HashSet::from(["привет".to_string()]);
        let mut store = MemoryCandidateStore::new();

        let record = run_at(
            "  Привет, Валентин! Обсудили план на 25 марта 2025.  ",
            "2024-12-25_sync.txt",
            &dir,
            &stops,
            &mut store,
            today(),
        )
        .unwrap();

        assert_eq!(record.title, "2024-12-25_sync");
        assert_eq!(record.date, "2024-12-25");
        assert_eq!(record.attendees, vec!["Valentin"]);
        assert_eq!(record.fingerprint.len(), 64);
        assert!(record.text.starts_with("Привет"));
        assert!(!record.text.ends_with(' '));
    }

    #[test]
    fn test_empty_filename_gets_default_title() {
        let dir = PersonDirectory::default();
        let stops = HashSet::new();
        let mut store = MemoryCandidateStore::new();

        let record = run_at("короткая заметка", "", &dir, &stops, &mut store, today()).unwrap();
        assert_eq!(record.title, "Meeting");
        assert_eq!(record.date, "2025-06-15");
        assert!(record.attendees.is_empty());
    }

    #[test]
    fn test_long_title_truncated_on_char_boundary() {
        let dir = PersonDirectory::default();
        let stops = HashSet::new();
        let mut store = MemoryCandidateStore::new();

        let filename = format!("{}.txt", "ю".repeat(100));
        let record = run_at("текст", &filename, &dir, &stops, &mut store, today()).unwrap();
        assert_eq!(record.title.chars().count(), TITLE_MAX_CHARS);
    }

    #[test]
    fn test_unknown_names_reach_the_store() {
        let dir = directory();
        let stops = HashSet::new();
        let mut store = MemoryCandidateStore::new();

        run_at(
            "Alice рассказала статус",
            "notes.txt",
            &dir,
            &stops,
            &mut store,
            today(),
        )
        .unwrap();
        assert_eq!(store.get("Alice"), Some(1));
    }
}
