//! Dictionary file locations.
//!
//! The core loads four small JSON dictionaries at startup: the person
//! directory, the candidate store, the stopword list, and the tag
//! dictionary (with its legacy flat fallback). Where they live is host
//! configuration; the default is `~/.meetcore/dictionaries`, overridable
//! with `MEETCORE_DICT_DIR`.

use std::path::{Path, PathBuf};

/// Resolved paths to the dictionary files.
#[derive(Debug, Clone)]
pub struct DictionaryPaths {
    pub people: PathBuf,
    pub candidates: PathBuf,
    pub stopwords: PathBuf,
    pub tags: PathBuf,
    /// Legacy flat `synonym -> tag` mapping, used only when `tags` is
    /// absent or empty.
    pub legacy_synonyms: PathBuf,
}

impl DictionaryPaths {
    /// Build paths rooted at an explicit dictionary directory.
    pub fn in_dir(dir: &Path) -> Self {
        DictionaryPaths {
            people: dir.join("people.json"),
            candidates: dir.join("people_candidates.json"),
            stopwords: dir.join("people_stopwords.json"),
            tags: dir.join("tags.json"),
            legacy_synonyms: dir.join("tag_synonyms.json"),
        }
    }

    /// Resolve the dictionary directory: `MEETCORE_DICT_DIR` if set,
    /// otherwise `~/.meetcore/dictionaries`.
    pub fn resolve() -> Self {
        let dir = std::env::var_os("MEETCORE_DICT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".meetcore")
                    .join("dictionaries")
            });
        Self::in_dir(&dir)
    }
}
