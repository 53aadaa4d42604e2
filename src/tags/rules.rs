//! Tag dictionary loading.
//!
//! The structured dictionary (`tags.json`) maps canonical tag to a list of
//! synonyms. When it is missing or empty a legacy flat dictionary
//! (`tag_synonyms.json`, synonym to tag) is used instead. Both formats are
//! resolved into the same [`SynonymIndex`] at load time, so the classifier
//! never sees the difference.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::tags::index::SynonymIndex;

#[derive(Debug, Clone)]
pub enum TagRuleSource {
    /// `tags.json`: canonical tag -> synonyms.
    Structured(BTreeMap<String, Vec<String>>),
    /// `tag_synonyms.json`: synonym -> canonical tag.
    LegacyFlat(BTreeMap<String, String>),
}

impl TagRuleSource {
    /// Load the structured dictionary, falling back to the legacy flat
    /// format. Missing or corrupt files degrade to an empty dictionary.
    pub fn load(tags_path: &Path, legacy_path: &Path) -> Self {
        let structured = read_structured(tags_path);
        if !structured.is_empty() {
            return TagRuleSource::Structured(structured);
        }
        log::info!("Using legacy flat tag dictionary");
        TagRuleSource::LegacyFlat(read_legacy(legacy_path))
    }

    /// Resolve the rules into the normalized synonym index. Rules are
    /// visited in lexicographic tag order; the first rule to claim a
    /// normalized key keeps it.
    pub fn into_index(self) -> SynonymIndex {
        let mut index = SynonymIndex::new();
        match self {
            TagRuleSource::Structured(rules) => {
                for (tag, synonyms) in &rules {
                    for synonym in synonyms {
                        index.insert(synonym, tag);
                    }
                }
            }
            TagRuleSource::LegacyFlat(rules) => {
                for (synonym, tag) in &rules {
                    index.insert(synonym, tag);
                }
            }
        }
        log::debug!("Built index with {} normalized synonyms", index.len());
        index
    }
}

fn read_structured(path: &Path) -> BTreeMap<String, Vec<String>> {
    if !path.exists() {
        log::warn!("Tags file not found: {}", path.display());
        return BTreeMap::new();
    }
    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                log::error!("Failed to parse {}: {e}", path.display());
                BTreeMap::new()
            }
        },
        Err(e) => {
            log::error!("Failed to read {}: {e}", path.display());
            BTreeMap::new()
        }
    }
}

fn read_legacy(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        return BTreeMap::new();
    }
    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Failed to parse legacy synonyms {}: {e}", path.display());
                BTreeMap::new()
            }
        },
        Err(e) => {
            log::warn!("Failed to read legacy synonyms {}: {e}", path.display());
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::index::normalize_token;
    use std::fs;

    #[test]
    fn test_load_structured() {
        let dir = tempfile::tempdir().unwrap();
        let tags = dir.path().join("tags.json");
        fs::write(&tags, r#"{"area/finance": ["бюджет", "финансы"]}"#).unwrap();

        let source = TagRuleSource::load(&tags, &dir.path().join("missing.json"));
        assert!(matches!(source, TagRuleSource::Structured(_)));
        let index = source.into_index();
        assert_eq!(
            index.lookup(&normalize_token("бюджета")),
            Some("area/finance")
        );
    }

    #[test]
    fn test_fallback_to_legacy() {
        let dir = tempfile::tempdir().unwrap();
        let legacy = dir.path().join("tag_synonyms.json");
        fs::write(&legacy, r#"{"ифрс": "area/ifrs"}"#).unwrap();

        let source = TagRuleSource::load(&dir.path().join("tags.json"), &legacy);
        assert!(matches!(source, TagRuleSource::LegacyFlat(_)));
        let index = source.into_index();
        assert_eq!(index.lookup("ифрс"), Some("area/ifrs"));
    }

    #[test]
    fn test_corrupt_dictionaries_degrade_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tags = dir.path().join("tags.json");
        let legacy = dir.path().join("tag_synonyms.json");
        fs::write(&tags, "{not json").unwrap();
        fs::write(&legacy, "[1, 2]").unwrap();

        let index = TagRuleSource::load(&tags, &legacy).into_index();
        assert!(index.is_empty());
    }

    #[test]
    fn test_collision_first_tag_in_order_wins() {
        let dir = tempfile::tempdir().unwrap();
        let tags = dir.path().join("tags.json");
        fs::write(
            &tags,
            r#"{"area/delivery": ["спринт"], "area/planning": ["спринт"]}"#,
        )
        .unwrap();

        let index = TagRuleSource::load(&tags, &dir.path().join("missing.json")).into_index();
        assert_eq!(index.lookup(&normalize_token("спринт")), Some("area/delivery"));
    }
}
