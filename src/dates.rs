//! Meeting-date inference.
//!
//! Extracts a date from the filename and/or body text using ordered
//! strategies; total function, always returns a valid `YYYY-MM-DD` string.
//!
//! Strategy order:
//! 1. Full numeric date in the filename stem (capture tools usually stamp it).
//! 2. Word-based date in the body text, Russian or English month names,
//!    first calendrically-valid match left to right.
//! 3. Partial numeric date (day + month, no year) in the filename stem.
//! 4. Full or partial numeric date in the body text.
//! 5. Today (UTC).
//!
//! An invalid calendar combination (day 32, Feb 31) is a non-match and the
//! engine falls through to the next strategy. Month tables are explicit
//! lookup tables, not a locale library, so behavior is bit-for-bit
//! reproducible across platforms.

use std::path::Path;
use std::sync::OnceLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;

/// Body-text scan bound (chars) for the word-based strategy.
const WORD_SCAN_CHARS: usize = 6_000;
/// Body-text scan bound (chars) for the numeric fallback strategy.
const NUMERIC_SCAN_CHARS: usize = 5_000;

/// Russian month forms: nominative, genitive, prepositional, short.
const RU_MONTHS: &[(&str, u32)] = &[
    ("январь", 1), ("янв", 1), ("января", 1), ("январе", 1),
    ("февраль", 2), ("фев", 2), ("февраля", 2), ("феврале", 2),
    ("март", 3), ("мар", 3), ("марта", 3), ("марте", 3),
    ("апрель", 4), ("апр", 4), ("апреля", 4), ("апреле", 4),
    ("май", 5), ("мая", 5), ("мае", 5),
    ("июнь", 6), ("июн", 6), ("июня", 6), ("июне", 6),
    ("июль", 7), ("июл", 7), ("июля", 7), ("июле", 7),
    ("август", 8), ("авг", 8), ("августа", 8), ("августе", 8),
    ("сентябрь", 9), ("сен", 9), ("сентября", 9), ("сентябре", 9),
    ("октябрь", 10), ("окт", 10), ("октября", 10), ("октябре", 10),
    ("ноябрь", 11), ("ноя", 11), ("ноября", 11), ("ноябре", 11),
    ("декабрь", 12), ("дек", 12), ("декабря", 12), ("декабре", 12),
];

/// English month forms, full and abbreviated ("sept" included).
const EN_MONTHS: &[(&str, u32)] = &[
    ("january", 1), ("jan", 1),
    ("february", 2), ("feb", 2),
    ("march", 3), ("mar", 3),
    ("april", 4), ("apr", 4),
    ("may", 5),
    ("june", 6), ("jun", 6),
    ("july", 7), ("jul", 7),
    ("august", 8), ("aug", 8),
    ("september", 9), ("sep", 9), ("sept", 9),
    ("october", 10), ("oct", 10),
    ("november", 11), ("nov", 11),
    ("december", 12), ("dec", 12),
];

// Compile-once regex patterns via OnceLock.
fn re_num_dmy() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?P<d>\d{1,2})[._-](?P<m>\d{1,2})[._-](?P<y>\d{4})").unwrap())
}

fn re_num_ymd() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?P<y>\d{4})[._-](?P<m>\d{1,2})[._-](?P<d>\d{1,2})").unwrap())
}

fn re_num_dm() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?P<d>\d{1,2})[._-](?P<m>\d{1,2})(?:[._-]|$)").unwrap())
}

fn re_word_dmy() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 25 марта 2025 / 25 мар / 12 September 2024
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?P<d>\d{1,2})\s+(?P<m>[a-zа-яё\.]+)\s*(?P<y>\d{4})?\b").unwrap()
    })
}

fn re_word_mdy() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Mar 5, 2024 / Sept 15 2025
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?P<m>[a-zа-яё\.]+)\s+(?P<d>\d{1,2}),?\s*(?P<y>\d{4})?\b").unwrap()
    })
}

/// Infer the meeting date from filename and body text; falls back to the
/// current UTC date when nothing matches.
pub fn infer_meeting_date(filename: &str, text: &str) -> String {
    infer_meeting_date_at(filename, text, Utc::now().date_naive())
}

/// Same as [`infer_meeting_date`] with an injected "today" for the year
/// heuristic and the final fallback.
pub fn infer_meeting_date_at(filename: &str, text: &str, today: NaiveDate) -> String {
    let stem = file_stem(filename);

    let date = full_numeric_date(&stem)
        .or_else(|| word_date(clip_chars(text, WORD_SCAN_CHARS), today))
        .or_else(|| partial_numeric_date(&stem, today))
        .or_else(|| numeric_date_any(clip_chars(text, NUMERIC_SCAN_CHARS), today))
        .unwrap_or(today);

    date.format("%Y-%m-%d").to_string()
}

fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}

fn clip_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// Full numeric date with a 4-digit year: `DD.MM.YYYY`, `YYYY-MM-DD`,
/// `_`/`.`/`-` separated. First match per pattern; invalid is a non-match.
fn full_numeric_date(s: &str) -> Option<NaiveDate> {
    if let Some(caps) = re_num_dmy().captures(s) {
        let d: u32 = caps["d"].parse().ok()?;
        let m: u32 = caps["m"].parse().ok()?;
        let y: i32 = caps["y"].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return Some(date);
        }
    }
    if let Some(caps) = re_num_ymd().captures(s) {
        let y: i32 = caps["y"].parse().ok()?;
        let m: u32 = caps["m"].parse().ok()?;
        let d: u32 = caps["d"].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return Some(date);
        }
    }
    None
}

/// Day + month without a year. Assumes the most recent year for which the
/// date is not in the future; an impossible combination in both candidate
/// years is a non-match.
fn partial_numeric_date(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = re_num_dm().captures(s)?;
    let d: u32 = caps["d"].parse().ok()?;
    let m: u32 = caps["m"].parse().ok()?;
    resolve_yearless(d, m, today)
}

fn numeric_date_any(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    full_numeric_date(s).or_else(|| partial_numeric_date(s, today))
}

fn resolve_yearless(day: u32, month: u32, today: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;
    if let Some(cand) = NaiveDate::from_ymd_opt(today.year(), month, day) {
        if cand <= today {
            return Some(cand);
        }
    }
    NaiveDate::from_ymd_opt(today.year() - 1, month, day)
}

fn map_month(token: &str) -> Option<u32> {
    let t = token.trim_matches(|c: char| c == '.' || c.is_whitespace()).to_lowercase();
    RU_MONTHS
        .iter()
        .chain(EN_MONTHS.iter())
        .find(|(name, _)| *name == t)
        .map(|(_, n)| *n)
}

/// Word-based date: scans left to right across both Day-Month-Year and
/// Month-Day-Year token orders and returns the first calendrically-valid
/// match by position.
fn word_date(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let mut best: Option<(usize, NaiveDate)> = None;

    for re in [re_word_dmy(), re_word_mdy()] {
        for caps in re.captures_iter(s) {
            let month = match map_month(&caps["m"]) {
                Some(m) => m,
                None => continue,
            };
            let day: u32 = match caps["d"].parse() {
                Ok(d) => d,
                Err(_) => continue,
            };
            let date = match caps.name("y").and_then(|y| y.as_str().parse::<i32>().ok()) {
                Some(year) => NaiveDate::from_ymd_opt(year, month, day),
                None => resolve_yearless(day, month, today),
            };
            let date = match date {
                Some(d) => d,
                None => continue,
            };
            let pos = caps.get(0).map(|m| m.start()).unwrap_or(0);
            if best.map_or(true, |(p, _)| pos < p) {
                best = Some((pos, date));
            }
        }
    }

    best.map(|(_, d)| d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn infer(filename: &str, text: &str) -> String {
        infer_meeting_date_at(filename, text, today())
    }

    #[test]
    fn test_filename_full_date_dmy() {
        assert_eq!(infer("09_04_2025_Встреча.txt", ""), "2025-04-09");
        assert_eq!(infer("meeting_25.12.2024.txt", ""), "2024-12-25");
    }

    #[test]
    fn test_filename_full_date_ymd() {
        assert_eq!(infer("2024-12-25_meeting.txt", ""), "2024-12-25");
    }

    #[test]
    fn test_filename_wins_over_word_date_in_text() {
        assert_eq!(infer("2024-12-25_meeting.txt", "25 марта 2025"), "2024-12-25");
    }

    #[test]
    fn test_word_date_beats_numeric_text_date() {
        assert_eq!(
            infer("meeting.txt", "Запись от 01.01.2020. Встреча 25 марта 2025."),
            "2025-03-25"
        );
    }

    #[test]
    fn test_word_date_russian() {
        assert_eq!(infer("meeting.txt", "Встреча состоялась 15 марта 2024 года"), "2024-03-15");
        assert_eq!(infer("meeting.txt", "Дата: 20 дек 2023"), "2023-12-20");
    }

    #[test]
    fn test_word_date_english_dmy() {
        assert_eq!(infer("meeting.txt", "Meeting on 12 September 2024"), "2024-09-12");
        assert_eq!(infer("meeting.txt", "Review 5 Dec 2025"), "2025-12-05");
    }

    #[test]
    fn test_word_date_english_mdy() {
        assert_eq!(infer("meeting.txt", "Kickoff on Mar 5, 2024"), "2024-03-05");
        assert_eq!(infer("meeting.txt", "Planning session Sept 15, 2025"), "2025-09-15");
    }

    #[test]
    fn test_word_date_yearless_past() {
        // April 7 is before the injected "today" (2025-06-15): current year.
        assert_eq!(infer("meeting.txt", "Синк 7 апр"), "2025-04-07");
    }

    #[test]
    fn test_word_date_yearless_future_rolls_back() {
        // Oct 7 would be in the future: previous year.
        assert_eq!(infer("meeting.txt", "Синк 7 окт"), "2024-10-07");
    }

    #[test]
    fn test_filename_partial_date() {
        assert_eq!(infer("09_04_Встреча.txt", "Шапка"), "2025-04-09");
        assert_eq!(infer("20_12_meeting.txt", ""), "2024-12-20");
    }

    #[test]
    fn test_numeric_date_in_text() {
        assert_eq!(infer("meeting.txt", "Дата встречи: 25.03.2025"), "2025-03-25");
        assert_eq!(infer("meeting.txt", "Встреча 25-12-2024"), "2024-12-25");
    }

    #[test]
    fn test_invalid_dates_fall_through_to_today() {
        assert_eq!(infer("meeting.txt", "32 марта 2025"), "2025-06-15");
        assert_eq!(infer("meeting.txt", "Встреча 31.02.2025 была"), "2025-06-15");
    }

    #[test]
    fn test_invalid_word_date_skipped_for_later_valid_one() {
        assert_eq!(infer("meeting.txt", "32 марта 2025, а точнее 30 марта 2025"), "2025-03-30");
    }

    #[test]
    fn test_fallback_today() {
        assert_eq!(infer("meeting.txt", "Обычный текст без дат"), "2025-06-15");
        assert_eq!(infer("", ""), "2025-06-15");
    }

    #[test]
    fn test_month_mapping() {
        assert_eq!(map_month("март"), Some(3));
        assert_eq!(map_month("МАРТА"), Some(3));
        assert_eq!(map_month("мар."), Some(3));
        assert_eq!(map_month("March"), Some(3));
        assert_eq!(map_month("sept"), Some(9));
        assert_eq!(map_month("notamonth"), None);
        assert_eq!(map_month(""), None);
    }
}
