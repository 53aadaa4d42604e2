//! Meeting-transcript ingestion core.
//!
//! Cooperating subsystems turn decoded transcript text into a normalized
//! record:
//!
//! - [`sanitize`] strips timestamps, speaker labels, and emoji so that
//!   texts differing only in capture noise compare equal;
//! - [`fingerprint`] hashes the sanitized text into a stable content
//!   identity;
//! - [`dates`] infers the meeting date from the filename and body;
//! - [`people`] resolves attendees against a person directory and learns
//!   unknown name candidates;
//! - [`tags`] classifies the text against a synonym dictionary.
//!
//! [`ingest::run`] wires them together per transcript. Everything is
//! synchronous and total: bad input degrades to a defined empty output,
//! and only candidate-store persistence failures surface as errors.

pub mod config;
pub mod dates;
pub mod error;
pub mod fingerprint;
pub mod ingest;
pub mod people;
pub mod sanitize;
pub mod tags;
pub mod types;

pub use config::DictionaryPaths;
pub use error::IngestError;
pub use fingerprint::{fingerprint, same_content, short_fingerprint};
pub use people::{
    load_stopwords, resolve_attendees, CandidateStore, JsonCandidateStore, MemoryCandidateStore,
    PersonDirectory,
};
pub use sanitize::sanitize;
pub use tags::{classify, SynonymIndex, TagRuleSource};
pub use types::{PersonEntry, TagMeta, TranscriptRecord};
