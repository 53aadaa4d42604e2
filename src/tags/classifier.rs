//! Threshold-based tag classification.

use std::collections::{BTreeMap, BTreeSet};

use crate::tags::index::{token_counts, SynonymIndex};
use crate::types::TagMeta;

/// Classify a summary against the synonym index.
///
/// Evidence is pooled per tag: the counts of every synonym belonging to a
/// tag are summed, and the tag is emitted when the sum reaches `threshold`.
/// One `person/<slug>` tag is added per attendee. Output is sorted for
/// stable comparison.
pub fn classify(
    summary: &str,
    meta: &TagMeta,
    threshold: u32,
    index: &SynonymIndex,
) -> Vec<String> {
    let full_text = format!("{} {}", summary, meta.title);
    let counts = token_counts(&full_text);

    let mut per_tag: BTreeMap<&str, u32> = BTreeMap::new();
    for (token, count) in &counts {
        if let Some(tag) = index.lookup(token) {
            *per_tag.entry(tag).or_insert(0) += count;
            log::debug!("Tag evidence: {token} ({count}x) -> {tag}");
        }
    }

    let mut tags: BTreeSet<String> = per_tag
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .map(|(tag, _)| tag.to_string())
        .collect();

    for person in &meta.attendees {
        let slug = person.trim().to_lowercase().replace(' ', "_");
        if !slug.is_empty() {
            tags.insert(format!("person/{slug}"));
        }
    }

    let result: Vec<String> = tags.into_iter().collect();
    log::info!("Found {} tags with threshold={threshold}", result.len());
    result
}
