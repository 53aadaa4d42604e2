//! Token normalization and the synonym lookup index.
//!
//! Normalization is a light multilingual stemmer: lowercase, strip
//! punctuation, then cut one typical inflection suffix as long as at least
//! three characters of stem remain. The same normalization is applied to
//! dictionary synonyms at load time and to transcript tokens at classify
//! time, so inflected mentions collapse onto the dictionary key.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

// Longest first, one cut per token.
const SUFFIXES: &[&str] = &[
    "ированием",
    "ирование",
    "ирования",
    "ованием",
    "ением",
    "ание",
    "ения",
    "ении",
    "tion",
    "ами",
    "ями",
    "ием",
    "ией",
    "ета",
    "ете",
    "ing",
    "ах",
    "ях",
    "ую",
    "ем",
    "ам",
    "ям",
    "ов",
    "ев",
    "ые",
    "ий",
    "ой",
    "ый",
    "ая",
    "ия",
    "ся",
    "ть",
    "ти",
    "ет",
    "ла",
    "ли",
    "ло",
    "es",
    "ed",
    "л",
    "s",
    "а",
    "е",
    "и",
    "о",
    "у",
    "ы",
    "я",
];

fn re_non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\-]+").unwrap())
}

fn re_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-zА-Яа-яЁё0-9\-]+").unwrap())
}

/// Normalize a single token: lowercase, strip non-word characters, cut one
/// inflection suffix when at least a 3-character stem remains. Tokens too
/// short to keep such a stem pass through unchanged.
pub fn normalize_token(word: &str) -> String {
    let lowered = word.to_lowercase();
    let cleaned = re_non_word().replace_all(&lowered, "");

    for suffix in SUFFIXES {
        if let Some(stem) = cleaned.strip_suffix(suffix) {
            if stem.chars().count() >= 3 {
                return stem.to_string();
            }
        }
    }
    cleaned.into_owned()
}

/// Frequency of normalized tokens in the text. Tokens that normalize to
/// fewer than two characters are dropped.
pub fn token_counts(text: &str) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in re_token().find_iter(text) {
        let normalized = normalize_token(token.as_str());
        if normalized.chars().count() < 2 {
            continue;
        }
        *counts.entry(normalized).or_insert(0) += 1;
    }
    counts
}

/// Flat lookup from normalized synonym to canonical tag. Many-to-one;
/// on duplicate normalized keys the first-loaded rule wins.
#[derive(Debug, Clone, Default)]
pub struct SynonymIndex {
    map: HashMap<String, String>,
}

impl SynonymIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a synonym for a tag; an existing mapping for the same
    /// normalized key is kept.
    pub fn insert(&mut self, synonym: &str, tag: &str) {
        let key = normalize_token(synonym);
        if key.is_empty() {
            return;
        }
        if let Some(existing) = self.map.get(&key) {
            log::debug!(
                "Duplicate synonym '{synonym}' -> '{key}' for tags '{existing}' and '{tag}'"
            );
            return;
        }
        self.map.insert(key, tag.to_string());
    }

    pub fn lookup(&self, normalized_token: &str) -> Option<&str> {
        self.map.get(normalized_token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
