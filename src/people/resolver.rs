//! Attendee resolution and candidate mining.
//!
//! Resolution matches directory aliases case-insensitively against the
//! scanned text and returns canonical ids in first-seen order. Any
//! name-shaped token that matches no alias is forwarded to the candidate
//! store, the self-growing half of the people dictionary, unless a
//! stopword suppresses it.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::IngestError;
use crate::people::directory::PersonDirectory;
use crate::people::store::CandidateStore;

// Compile-once regex patterns via OnceLock.
fn re_name_lat() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "John", "John Smith"
    RE.get_or_init(|| Regex::new(r"\b([A-Z][a-z]{2,15})(?:\s+([A-Z][a-z]{2,20}))?\b").unwrap())
}

fn re_name_cyr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "Иван", "Иван Петров"
    RE.get_or_init(|| {
        Regex::new(r"\b([А-ЯЁ][а-яё]{2,15})(?:\s+([А-ЯЁ][а-яё]{2,20}))?\b").unwrap()
    })
}

fn re_name_lat_hyphen() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "Mary-Jane"
    RE.get_or_init(|| Regex::new(r"\b([A-Z][a-z]+-[A-Z][a-z]+)\b").unwrap())
}

fn re_name_cyr_hyphen() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "Анна-Мария"
    RE.get_or_init(|| Regex::new(r"\b([А-ЯЁ][а-яё]+-[А-ЯЁ][а-яё]+)\b").unwrap())
}

fn re_name_initials() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "А. Петров", "A. Petrov"
    RE.get_or_init(|| {
        Regex::new(r"\b([А-ЯЁA-Z])\.\s*([А-ЯЁA-Z][а-яёa-z]{2,20})\b").unwrap()
    })
}

// Shapes that are definitely not names.
fn re_excludes() -> &'static [Regex; 6] {
    static RES: OnceLock<[Regex; 6]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            Regex::new(r"\b[A-Z]{2,}\b").unwrap(),         // "API", "CEO"
            Regex::new(r"\b\d+\b").unwrap(),               // bare numbers
            Regex::new(r"\b[A-Z][a-z]+\d+\b").unwrap(),    // "Version1"
            Regex::new(r"\S+@\S+").unwrap(),               // emails
            Regex::new(r"https?://\S+").unwrap(),          // URLs
            Regex::new(r"\b[А-ЯA-Z][\w\-]*\d+\b").unwrap(), // "Слово1"
        ]
    })
}

/// Valid short names the length filters would otherwise reject.
const SHORT_VALID_NAMES: &[&str] = &[
    "bob", "tom", "jim", "joe", "ann", "sue", "tim", "sam", "max", "dan", "jon", "ben", "ron",
    "ray", "guy", "ted", "leo", "art", "ira", "eva", "amy", "joy", "зоя", "лев", "рим", "дан",
    "том", "боб", "ким", "рой", "гай", "тед", "лео", "арт", "ева", "эми",
];

/// Short Russian words that are real given names.
const SHORT_RU_NAMES: &[&str] = &["ваня", "катя", "петя", "коля", "маша", "даша"];

/// Russian suffixes that mark abstract nouns and verb forms, never names.
const RU_NON_NAME_ENDINGS: &[&str] = &["ость", "ение", "ание", "ться", "шься", "тся"];

fn clip_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// Resolve canonical attendee ids from the scanned text.
///
/// Case-insensitive alias containment; output in first-seen order (earliest
/// alias match position, ties to the earlier-loaded entry), no duplicates.
/// `max_scan` bounds the scanned prefix by character count; `None` scans
/// everything.
pub fn resolve_attendees(
    text: &str,
    directory: &PersonDirectory,
    max_scan: Option<usize>,
) -> Vec<String> {
    if text.trim().is_empty() || directory.is_empty() {
        return Vec::new();
    }
    let hay = match max_scan {
        Some(n) => clip_chars(text, n),
        None => text,
    }
    .to_lowercase();

    // canonical id -> (earliest match position, load order)
    let mut best: HashMap<&str, (usize, usize)> = HashMap::new();
    for (order, (alias, canonical)) in directory.alias_rows().enumerate() {
        if let Some(pos) = hay.find(alias) {
            let entry = best.entry(canonical).or_insert((pos, order));
            if pos < entry.0 {
                *entry = (pos, order);
            }
        }
    }

    let mut found: Vec<(&str, (usize, usize))> = best.into_iter().collect();
    found.sort_by_key(|(_, key)| *key);
    found.into_iter().map(|(id, _)| id.to_string()).collect()
}

/// Extract new-name candidates from the text: name-shaped tokens that match
/// no known alias and no stopword. Surface forms are preserved (whitespace
/// normalized only); result is sorted and unique.
pub fn mine_candidates(
    text: &str,
    directory: &PersonDirectory,
    stopwords: &HashSet<String>,
    max_scan: Option<usize>,
) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let hay = match max_scan {
        Some(n) => clip_chars(text, n),
        None => text,
    };

    let mut raw: BTreeSet<String> = BTreeSet::new();
    for re in [re_name_lat(), re_name_cyr()] {
        for caps in re.captures_iter(hay) {
            let mut parts: Vec<&str> = Vec::new();
            if let Some(m) = caps.get(1) {
                parts.push(m.as_str());
            }
            if let Some(m) = caps.get(2) {
                parts.push(m.as_str());
            }
            let candidate = parts.join(" ");
            if is_valid_name_candidate(&candidate) {
                raw.insert(candidate);
            }
        }
    }
    for re in [re_name_lat_hyphen(), re_name_cyr_hyphen()] {
        for caps in re.captures_iter(hay) {
            let candidate = caps[1].to_string();
            if is_valid_name_candidate(&candidate) {
                raw.insert(candidate);
            }
        }
    }
    for caps in re_name_initials().captures_iter(hay) {
        let candidate = format!("{}. {}", &caps[1], &caps[2]);
        if is_valid_name_candidate(&candidate) {
            raw.insert(candidate);
        }
    }

    let known = directory.known_names_lower();
    let mut filtered: BTreeSet<String> = BTreeSet::new();
    for candidate in raw {
        let norm = candidate.split_whitespace().collect::<Vec<_>>().join(" ");
        let lower = norm.to_lowercase();
        if known.contains(&lower) {
            continue;
        }
        if stopwords.contains(&lower)
            || norm
                .split_whitespace()
                .any(|w| stopwords.contains(&w.to_lowercase()))
        {
            continue;
        }
        filtered.insert(norm);
    }

    let result: Vec<String> = filtered.into_iter().collect();
    log::debug!("Found {} new name candidates in text", result.len());
    result
}

/// Resolve attendees and record unmatched
/// name-like tokens into the candidate store. Empty text resolves to an
/// empty list with no store mutation; store write failures propagate.
pub fn resolve_and_learn(
    text: &str,
    directory: &PersonDirectory,
    stopwords: &HashSet<String>,
    store: &mut dyn CandidateStore,
    max_scan: Option<usize>,
) -> Result<Vec<String>, IngestError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let attendees = resolve_attendees(text, directory, max_scan);
    let candidates = mine_candidates(text, directory, stopwords, max_scan);
    if !candidates.is_empty() {
        store.bump(&candidates)?;
    }
    Ok(attendees)
}

fn is_valid_name_candidate(candidate: &str) -> bool {
    if re_excludes().iter().any(|re| re.is_match(candidate)) {
        return false;
    }

    let char_len = candidate.chars().count();
    if !(2..=50).contains(&char_len) {
        return false;
    }
    if !candidate.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
    if digits > char_len / 2 {
        return false;
    }

    // Require at least one long word, with carve-outs for initials
    // ("А. Петров") and real short names.
    let words: Vec<&str> = candidate.split_whitespace().collect();
    if !words.iter().any(|w| w.chars().count() >= 4) {
        let is_initials =
            words.len() == 2 && words[0].chars().count() == 2 && words[0].ends_with('.');
        let has_short_valid = words
            .iter()
            .any(|w| SHORT_VALID_NAMES.contains(&w.to_lowercase().as_str()));
        if !(is_initials || has_short_valid) {
            return false;
        }
    }

    if candidate.chars().any(|c| ('\u{400}'..='\u{4FF}').contains(&c)) {
        let lower = candidate.to_lowercase();
        if char_len <= 3 && !SHORT_RU_NAMES.contains(&lower.as_str()) {
            return false;
        }
        if RU_NON_NAME_ENDINGS.iter().any(|end| lower.ends_with(end)) {
            return false;
        }
    }

    true
}

/// Propose a canonical English name for an observed alias: Cyrillic words
/// are transliterated, capitalization is repaired ("o'connor" → "O'Connor",
/// "mcdonald" → "McDonald"). Used when promoting a candidate into the
/// directory.
pub fn propose_name_en(alias: &str) -> String {
    let alias = alias.trim();
    if alias.is_empty() {
        return String::new();
    }

    alias
        .split_whitespace()
        .map(|word| {
            if word
                .chars()
                .all(|c| c.is_ascii_alphabetic() || "-'.".contains(c))
            {
                if word.contains('-') {
                    word.split('-')
                        .filter(|p| !p.is_empty())
                        .map(cap_token)
                        .collect::<Vec<_>>()
                        .join("-")
                } else {
                    cap_token(word)
                }
            } else if word.chars().any(|c| ('\u{400}'..='\u{4FF}').contains(&c)) {
                cap_token(&translit_ru_en(word))
            } else {
                cap_token(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn cap_token(token: &str) -> String {
    if let Some((head, tail)) = token.split_once('\'') {
        return format!("{}'{}", capitalize(head), capitalize(tail));
    }
    let lower = token.to_lowercase();
    if lower.starts_with("mc") && token.chars().count() > 2 {
        return format!("Mc{}", capitalize(&token[2..]));
    }
    capitalize(token)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Simplified GOST-style Russian → Latin transliteration, case-preserving.
fn translit_ru_en(s: &str) -> String {
    const TABLE: &[(char, &str)] = &[
        ('А', "A"), ('Б', "B"), ('В', "V"), ('Г', "G"), ('Д', "D"), ('Е', "E"), ('Ё', "E"),
        ('Ж', "Zh"), ('З', "Z"), ('И', "I"), ('Й', "Y"), ('К', "K"), ('Л', "L"), ('М', "M"),
        ('Н', "N"), ('О', "O"), ('П', "P"), ('Р', "R"), ('С', "S"), ('Т', "T"), ('У', "U"),
        ('Ф', "F"), ('Х', "Kh"), ('Ц', "Ts"), ('Ч', "Ch"), ('Ш', "Sh"), ('Щ', "Sch"),
        ('Ы', "Y"), ('Э', "E"), ('Ю', "Yu"), ('Я', "Ya"), ('Ь', ""), ('Ъ', ""),
    ];

    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let upper = c.to_uppercase().next().unwrap_or(c);
        match TABLE.iter().find(|(k, _)| *k == upper) {
            Some((_, mapped)) => {
                if c.is_lowercase() {
                    out.push_str(&mapped.to_lowercase());
                } else {
                    out.push_str(mapped);
                }
            }
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::people::store::MemoryCandidateStore;
    use crate::types::PersonEntry;

    fn directory() -> PersonDirectory {
        PersonDirectory::from_entries(vec![
            PersonEntry {
                name_en: "Valentin".to_string(),
                aliases: vec!["Валентин".to_string(), "Валя".to_string()],
            },
            PersonEntry {
                name_en: "Daniil".to_string(),
                aliases: vec!["Даня".to_string(), "Daniil".to_string()],
            },
            PersonEntry {
                name_en: "Katya".to_string(),
                aliases: vec!["Катя".to_string(), "Катей".to_string()],
            },
        ])
    }

    fn stopwords(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_lowercase()).collect()
    }

    #[test]
    fn test_resolve_simple() {
        let found = resolve_attendees("Привет, Валентин!", &directory(), None);
        assert_eq!(found, vec!["Valentin"]);
    }

    #[test]
    fn test_resolve_case_insensitive_and_inflected() {
        let found = resolve_attendees("Встреча с ВАЛЕНТИНОМ и daniil", &directory(), None);
        assert_eq!(found, vec!["Valentin", "Daniil"]);
    }

    #[test]
    fn test_resolve_no_duplicates() {
        let found = resolve_attendees("Валентин, Валя, Валентин - один человек", &directory(), None);
        assert_eq!(found, vec!["Valentin"]);
    }

    #[test]
    fn test_resolve_first_seen_order() {
        // Daniil appears before Valentin in the text, despite load order.
        let found = resolve_attendees("Даня начал, потом Валентин ответил", &directory(), None);
        assert_eq!(found, vec!["Daniil", "Valentin"]);
    }

    #[test]
    fn test_resolve_alias_collision_first_loaded_wins() {
        let dir = PersonDirectory::from_entries(vec![
            PersonEntry {
                name_en: "First".to_string(),
                aliases: vec!["Шарик".to_string()],
            },
            PersonEntry {
                name_en: "Second".to_string(),
                aliases: vec!["Шарик".to_string()],
            },
        ]);
        let found = resolve_attendees("Пришел Шарик", &dir, None);
        assert_eq!(found, vec!["First"]);
    }

    #[test]
    fn test_resolve_empty_text_and_empty_directory() {
        assert!(resolve_attendees("", &directory(), None).is_empty());
        assert!(resolve_attendees("Валентин", &PersonDirectory::default(), None).is_empty());
    }

    #[test]
    fn test_resolve_respects_max_scan() {
        let text = format!("{} Валентин", "x".repeat(100));
        assert!(resolve_attendees(&text, &directory(), Some(50)).is_empty());
        assert_eq!(
            resolve_attendees(&text, &directory(), None),
            vec!["Valentin"]
        );
    }

    #[test]
    fn test_mine_unknown_names() {
        let stops = stopwords(&["привет", "встреча"]);
        let found = mine_candidates("Привет, на встрече были Alice и Богдан", &directory(), &stops, None);
        assert!(found.contains(&"Alice".to_string()));
        assert!(found.contains(&"Богдан".to_string()));
    }

    #[test]
    fn test_mine_skips_known_aliases() {
        let stops = stopwords(&[]);
        let found = mine_candidates("Валентин и Даня обсудили", &directory(), &stops, None);
        assert!(!found.contains(&"Валентин".to_string()));
        assert!(!found.contains(&"Даня".to_string()));
    }

    #[test]
    fn test_mine_skips_stopwords() {
        let stops = stopwords(&["alice"]);
        let found = mine_candidates("Alice joined the call", &directory(), &stops, None);
        assert!(!found.iter().any(|c| c.to_lowercase().contains("alice")));
    }

    #[test]
    fn test_mine_rejects_non_names() {
        let stops = stopwords(&[]);
        let found = mine_candidates(
            "API docs at https://example.com, ping admin@example.com, build Version2",
            &directory(),
            &stops,
            None,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_mine_accepts_hyphenated_and_initials() {
        let stops = stopwords(&[]);
        let found = mine_candidates("Ждем Анна-Мария и А. Петров", &directory(), &stops, None);
        assert!(found.contains(&"Анна-Мария".to_string()));
        assert!(found.contains(&"А. Петров".to_string()));
    }

    #[test]
    fn test_mine_empty_text() {
        assert!(mine_candidates("", &directory(), &stopwords(&[]), None).is_empty());
    }

    #[test]
    fn test_resolve_and_learn_counts_grow() {
        let dir = directory();
        let stops = stopwords(&["привет"]);
        let mut store = MemoryCandidateStore::new();

        for _ in 0..3 {
            let found =
                resolve_and_learn("Привет, Alice и Валентин", &dir, &stops, &mut store, None)
                    .unwrap();
            assert_eq!(found, vec!["Valentin"]);
        }
        assert_eq!(store.get("Alice"), Some(3));
    }

    #[test]
    fn test_resolve_and_learn_stopword_never_recorded() {
        let dir = directory();
        let stops = stopwords(&["alice"]);
        let mut store = MemoryCandidateStore::new();

        resolve_and_learn("Alice снова на звонке", &dir, &stops, &mut store, None).unwrap();
        assert_eq!(store.get("Alice"), None);
    }

    #[test]
    fn test_resolve_and_learn_empty_text_no_mutation() {
        let dir = directory();
        let mut store = MemoryCandidateStore::new();
        let found =
            resolve_and_learn("   ", &dir, &stopwords(&[]), &mut store, None).unwrap();
        assert!(found.is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_propose_name_en_transliterates() {
        assert_eq!(propose_name_en("Валентин"), "Valentin");
        assert_eq!(propose_name_en("саша"), "Sasha");
        assert_eq!(propose_name_en("Юля Щеглова"), "Yulya Scheglova");
    }

    #[test]
    fn test_propose_name_en_capitalization_fixups() {
        assert_eq!(propose_name_en("o'connor"), "O'Connor");
        assert_eq!(propose_name_en("mcdonald"), "McDonald");
        assert_eq!(propose_name_en("mary-jane smith"), "Mary-Jane Smith");
        assert_eq!(propose_name_en(""), "");
    }
}
