//! Stable content fingerprints for near-duplicate detection.
//!
//! Two captures of the same meeting, with different filenames, timestamps,
//! speaker-label spellings, or casing, must hash identically, so the
//! digest is computed over [`sanitize`](crate::sanitize::sanitize) output,
//! never the raw text.

use std::collections::HashMap;

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::sanitize::sanitize;

/// Memo cache bound. Repeated fingerprinting of the same transcript within
/// a process (dedup check, then record build) hits the cache; eviction is a
/// wholesale clear once the bound is reached.
const CACHE_MAX_ENTRIES: usize = 128;

static CACHE: Mutex<Option<HashMap<String, String>>> = Mutex::new(None);

/// Compute the stable 64-hex-char SHA-256 fingerprint of a transcript.
///
/// Deterministic and pure; memoized by input value.
pub fn fingerprint(text: &str) -> String {
    {
        let cache = CACHE.lock();
        if let Some(hit) = cache.as_ref().and_then(|m| m.get(text)) {
            return hit.clone();
        }
    }

    let digest = compute(text);

    let mut cache = CACHE.lock();
    let map = cache.get_or_insert_with(HashMap::new);
    if map.len() >= CACHE_MAX_ENTRIES {
        map.clear();
    }
    map.insert(text.to_string(), digest.clone());
    digest
}

/// First `len` characters of the full fingerprint, for display and log lines.
pub fn short_fingerprint(text: &str, len: usize) -> String {
    let full = fingerprint(text);
    full.chars().take(len).collect()
}

/// Whether two texts are the same content after sanitization.
pub fn same_content(a: &str, b: &str) -> bool {
    fingerprint(a) == fingerprint(b)
}

fn compute(text: &str) -> String {
    let normalized = sanitize(text);
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_stable() {
        let text = "Тестовый текст встречи";
        let h1 = fingerprint(text);
        let h2 = fingerprint(text);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_ignores_timestamps() {
        let a = "Валентин 12:30: Обсуждаем проект";
        let b = "Валентин 15:45: Обсуждаем проект";
        assert_eq!(fingerprint(a), fingerprint(b));
    }

    #[test]
    fn test_fingerprint_ignores_speaker_label_spelling() {
        let a = "Speaker: Обсуждаем проект";
        let b = "Спикер: Обсуждаем проект";
        assert_eq!(fingerprint(a), fingerprint(b));
    }

    #[test]
    fn test_fingerprint_ignores_numbered_speaker_labels() {
        let a = "Speaker 1: Обсуждаем бюджет на квартал";
        let b = "Спикер 1: Обсуждаем бюджет на квартал";
        let c = "Спикер 2: Обсуждаем бюджет на квартал";
        assert_eq!(fingerprint(a), fingerprint(b));
        assert_eq!(fingerprint(a), fingerprint(c));
    }

    #[test]
    fn test_fingerprint_ignores_case_and_whitespace() {
        let a = "Обсуждаем   Проект\n\nи бюджет";
        let b = "обсуждаем проект и бюджет";
        assert_eq!(fingerprint(a), fingerprint(b));
    }

    #[test]
    fn test_fingerprint_sensitive_to_content() {
        assert_ne!(
            fingerprint("Обсуждаем бюджет на март"),
            fingerprint("Обсуждаем бюджет на апрель")
        );
        assert_ne!(fingerprint("planning the rollout"), fingerprint("planning the rollback"));
    }

    #[test]
    fn test_short_fingerprint_is_prefix() {
        let text = "Kickoff notes";
        let full = fingerprint(text);
        let short = short_fingerprint(text, 16);
        assert_eq!(short.len(), 16);
        assert!(full.starts_with(&short));
    }

    #[test]
    fn test_same_content() {
        assert!(same_content("Привет! 12:30", "Привет! 09:15"));
        assert!(!same_content("Привет!", "Пока!"));
    }

    #[test]
    fn test_empty_input_hashes_empty_string() {
        // SHA-256 of ""; sanitize("  ") is also ""
        assert_eq!(fingerprint(""), fingerprint("   \n  "));
    }
}
