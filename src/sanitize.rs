//! Deterministic transcript text cleaning.
//!
//! Removes the incidental variation that makes two captures of the same
//! meeting differ byte-wise: timestamps, speaker-label prefixes, emoji,
//! casing, and whitespace. The fingerprint module hashes the output, so
//! every step here must be stable across platforms and releases.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Known speaker markers stripped from line starts. The role words cover
/// the capture tools we see in the wild; the first names are a fixed roster
/// kept only for hash stability and deliberately independent of the
/// configurable person directory used for attendee resolution.
const SPEAKER_MARKERS: &str = "speaker|спикер|говорящий|участник|valentin|валентин|валя|sasha|саша";

// Compile-once regex patterns via OnceLock.
fn re_timestamp() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 12:34 or 1:02:03
    RE.get_or_init(|| Regex::new(r"\b\d{1,2}:\d{2}(:\d{2})?\b").unwrap())
}

fn re_speaker_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Up to 20 chars of ordinal/name between the marker and the
        // separator, so "Speaker 1:" and "Speaker:" strip the same way
        Regex::new(&format!(
            r"(?mi)^[ \t]*(?:\d{{1,2}}:\d{{2}}(?::\d{{2}})?[ \t]+)?(?:{SPEAKER_MARKERS})[^\n:#-]{{0,20}}[:#-][ \t]*"
        ))
        .unwrap()
    })
}

fn re_participant_dash() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "Участник - Имя:" forms
    RE.get_or_init(|| Regex::new(r"(?mi)^[ \t]*участник[ \t]*-[ \t]*\w+[ \t]*:[ \t]*").unwrap())
}

/// Emoji and pictographic blocks removed before hashing. Fixed list, not a
/// Unicode-version-dependent property lookup, so the digest never shifts
/// under a library upgrade.
fn is_pictographic(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F600..=0x1F64F   // emoticons
        | 0x1F300..=0x1F5FF // symbols & pictographs
        | 0x1F680..=0x1F6FF // transport & map
        | 0x1F1E0..=0x1F1FF // regional indicators
        | 0x2702..=0x27B0   // dingbats
        | 0x24C2..=0x1F251
    )
}

/// Normalize transcript text for stable comparison.
///
/// Steps, in order: NFC normalization, time-of-day removal, speaker-label
/// prefix stripping, emoji removal, whitespace collapse + trim + lowercase.
/// Pure function; empty or whitespace-only input yields the empty string.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // NFC so combining-mark spellings of the same glyph compare equal
    let normalized: String = text.nfc().collect();

    let no_timestamps = re_timestamp().replace_all(&normalized, "");

    // The "Участник - Имя:" form first, before the generic prefix eats
    // the role word and leaves the name behind.
    let no_speakers = re_participant_dash().replace_all(&no_timestamps, "");
    let no_speakers = re_speaker_prefix().replace_all(&no_speakers, "");

    let no_emoji: String = no_speakers
        .chars()
        .filter(|c| !is_pictographic(*c))
        .collect();

    no_emoji
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
