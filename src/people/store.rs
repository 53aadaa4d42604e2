//! Candidate learning store: observed-but-unknown names with counters.
//!
//! A name-like token that matches no directory alias is recorded here with
//! an observation count; the host's review flow later promotes frequent
//! candidates into the directory. Keys are the literal observed surface
//! form (not case-folded) so display fidelity survives the round trip.
//!
//! Read failures degrade to an empty store; write failures are surfaced,
//! since silently losing learned candidates has no visible symptom.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Injected persistence seam for the attendee resolver.
pub trait CandidateStore {
    /// Current observation count for a surface form, if any.
    fn get(&self, name: &str) -> Option<u32>;

    /// Increment counts for the given surface forms, creating entries at 1.
    /// Blank names are ignored.
    fn bump(&mut self, names: &[String]) -> Result<(), IngestError>;

    /// Full contents, ordered for stable display.
    fn snapshot(&self) -> BTreeMap<String, u32>;

    /// Drop a single candidate (review flow: promoted or rejected).
    /// Returns whether it existed.
    fn remove(&mut self, name: &str) -> Result<bool, IngestError>;

    /// Drop everything (maintenance).
    fn clear(&mut self) -> Result<(), IngestError>;

    /// Aggregate counts for the admin surface.
    fn stats(&self) -> CandidateStats {
        let snapshot = self.snapshot();
        let counts: Vec<u32> = snapshot.values().copied().collect();
        CandidateStats {
            total: counts.len(),
            max_count: counts.iter().copied().max().unwrap_or(0),
            min_count: counts.iter().copied().min().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateStats {
    pub total: usize,
    pub max_count: u32,
    pub min_count: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CandidateFile {
    #[serde(default)]
    candidates: HashMap<String, u32>,
}

/// File-backed store: `{"candidates": {name: count}}`. Every mutation is a
/// read-modify-write of the whole file; multi-process atomicity is not
/// assumed and single-writer discipline is the host's job.
#[derive(Debug, Clone)]
pub struct JsonCandidateStore {
    path: PathBuf,
}

impl JsonCandidateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonCandidateStore { path: path.into() }
    }

    fn read(&self) -> HashMap<String, u32> {
        if !self.path.exists() {
            return HashMap::new();
        }
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to read {}: {}", self.path.display(), e);
                return HashMap::new();
            }
        };
        match serde_json::from_str::<CandidateFile>(&content) {
            Ok(file) => file.candidates,
            Err(e) => {
                log::warn!("Corrupt candidate store {}: {}", self.path.display(), e);
                HashMap::new()
            }
        }
    }

    fn write(&self, candidates: HashMap<String, u32>) -> Result<(), IngestError> {
        let store_err = |message: String| IngestError::CandidateStoreWrite {
            path: self.path.clone(),
            message,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| store_err(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(&CandidateFile { candidates })
            .map_err(|e| store_err(e.to_string()))?;

        // Write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| store_err(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| store_err(e.to_string()))?;
        Ok(())
    }
}

impl CandidateStore for JsonCandidateStore {
    fn get(&self, name: &str) -> Option<u32> {
        self.read().get(name).copied()
    }

    fn bump(&mut self, names: &[String]) -> Result<(), IngestError> {
        let mut candidates = self.read();
        let mut added = 0;
        for raw in names {
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }
            let count = candidates.entry(name.to_string()).or_insert(0);
            if *count == 0 {
                added += 1;
            }
            *count += 1;
        }
        self.write(candidates)?;
        if added > 0 {
            log::info!("Recorded {} new name candidates", added);
        }
        Ok(())
    }

    fn snapshot(&self) -> BTreeMap<String, u32> {
        self.read().into_iter().collect()
    }

    fn remove(&mut self, name: &str) -> Result<bool, IngestError> {
        let mut candidates = self.read();
        let existed = candidates.remove(name).is_some();
        if existed {
            self.write(candidates)?;
            log::info!("Removed candidate: {}", name);
        }
        Ok(existed)
    }

    fn clear(&mut self) -> Result<(), IngestError> {
        self.write(HashMap::new())?;
        log::info!("Cleared candidates dictionary");
        Ok(())
    }
}

/// In-memory store for tests and hosts that persist elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryCandidateStore {
    candidates: HashMap<String, u32>,
}

impl MemoryCandidateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CandidateStore for MemoryCandidateStore {
    fn get(&self, name: &str) -> Option<u32> {
        self.candidates.get(name).copied()
    }

    fn bump(&mut self, names: &[String]) -> Result<(), IngestError> {
        for raw in names {
            let name = raw.trim();
            if !name.is_empty() {
                *self.candidates.entry(name.to_string()).or_insert(0) += 1;
            }
        }
        Ok(())
    }

    fn snapshot(&self) -> BTreeMap<String, u32> {
        self.candidates.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    fn remove(&mut self, name: &str) -> Result<bool, IngestError> {
        Ok(self.candidates.remove(name).is_some())
    }

    fn clear(&mut self) -> Result<(), IngestError> {
        self.candidates.clear();
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct StopwordFile {
    #[serde(default)]
    stop: Vec<String>,
}

/// Load the stopword set (lowercased). Absent or corrupt file → empty set.
pub fn load_stopwords(path: &Path) -> HashSet<String> {
    if !path.exists() {
        return HashSet::new();
    }
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Failed to read {}: {}", path.display(), e);
            return HashSet::new();
        }
    };
    match serde_json::from_str::<StopwordFile>(&content) {
        Ok(file) => file
            .stop
            .into_iter()
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect(),
        Err(e) => {
            log::warn!("Corrupt stopword file {}: {}", path.display(), e);
            HashSet::new()
        }
    }
}
