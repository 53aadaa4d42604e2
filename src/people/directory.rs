//! Person directory: canonical identifiers and their known name variants.
//!
//! Loaded once at startup, immutable for the process lifetime. Two file
//! formats are accepted: a bare JSON array of person objects and the older
//! `{"people": [...]}` wrapper. A missing or corrupt file degrades to an
//! empty directory (zero matches), never an error.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::types::PersonEntry;

#[derive(Deserialize)]
#[serde(untagged)]
enum PeopleFile {
    List(Vec<PersonEntry>),
    Wrapped { people: Vec<PersonEntry> },
}

/// The loaded directory. Entry order is load order; alias collisions across
/// entries resolve to the earlier entry (deterministic tie-break, see tests).
#[derive(Debug, Clone, Default)]
pub struct PersonDirectory {
    entries: Vec<PersonEntry>,
    /// (lowercased alias, entry index), flattened in load order.
    alias_rows: Vec<(String, usize)>,
}

impl PersonDirectory {
    /// Load the directory from a JSON file. Absent or unparseable files
    /// yield an empty directory with a warning.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("People dictionary {} does not exist", path.display());
            return Self::default();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str::<PeopleFile>(&content) {
            Ok(PeopleFile::List(entries)) | Ok(PeopleFile::Wrapped { people: entries }) => {
                let dir = Self::from_entries(entries);
                log::debug!(
                    "Loaded {} people ({} aliases) from {}",
                    dir.entries.len(),
                    dir.alias_rows.len(),
                    path.display()
                );
                dir
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Build a directory from in-memory entries (tests, embedded hosts).
    /// An alias claimed by more than one entry stays with the first-loaded
    /// one; later claims are dropped with a warning.
    pub fn from_entries(entries: Vec<PersonEntry>) -> Self {
        let mut alias_rows: Vec<(String, usize)> = Vec::new();
        let mut claimed: HashSet<String> = HashSet::new();
        for (idx, person) in entries.iter().enumerate() {
            for alias in &person.aliases {
                let key = alias.trim().to_lowercase();
                if key.is_empty() {
                    continue;
                }
                if claimed.insert(key.clone()) {
                    alias_rows.push((key, idx));
                } else {
                    log::warn!(
                        "Alias '{}' already claimed; ignoring it on '{}'",
                        alias,
                        person.name_en
                    );
                }
            }
        }
        PersonDirectory { entries, alias_rows }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[PersonEntry] {
        &self.entries
    }

    /// Lowercased aliases paired with their entry's canonical id, in load
    /// order. The resolver's matching tables.
    pub fn alias_rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.alias_rows
            .iter()
            .map(|(alias, idx)| (alias.as_str(), self.entries[*idx].name_en.as_str()))
    }

    /// Every known surface form, lowercased: all aliases plus the canonical
    /// ids themselves. Used to keep known people out of the candidate store.
    pub fn known_names_lower(&self) -> HashSet<String> {
        let mut known: HashSet<String> =
            self.alias_rows.iter().map(|(a, _)| a.clone()).collect();
        for person in &self.entries {
            let name = person.name_en.trim().to_lowercase();
            if !name.is_empty() {
                known.insert(name);
            }
        }
        known
    }

    /// Structural validation for a single entry, used by the host's review
    /// flow before committing a promoted candidate to the directory.
    pub fn validate_entry(person: &PersonEntry) -> Vec<String> {
        let mut errors = Vec::new();

        if person.name_en.trim().is_empty() {
            errors.push("Missing required field: name_en".to_string());
        } else if !person
            .name_en
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || "-'.".contains(c))
        {
            errors.push(format!("Invalid name_en format: {}", person.name_en));
        }

        let aliases: Vec<&str> = person
            .aliases
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect();
        if aliases.is_empty() {
            errors.push("Field 'aliases' cannot be empty".to_string());
        } else {
            let lower: HashSet<String> = aliases.iter().map(|a| a.to_lowercase()).collect();
            if lower.len() != aliases.len() {
                errors.push("Aliases contain duplicates (case-insensitive)".to_string());
            }
        }
        if person.aliases.iter().any(|a| a.trim().is_empty()) {
            errors.push("Aliases cannot contain empty strings".to_string());
        }

        errors
    }
}
