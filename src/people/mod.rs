//! Attendee attribution: the person directory, the self-growing candidate
//! store, and the resolver that connects them.
//!
//! The directory and stopword list are read-only after load. The candidate
//! store is the one piece of the core with real I/O and mutable state, so it
//! sits behind a trait and is injected into the resolver; tests and
//! persistence-free hosts swap in the in-memory implementation.

pub mod directory;
pub mod resolver;
pub mod store;

pub use directory::PersonDirectory;
pub use resolver::{mine_candidates, propose_name_en, resolve_and_learn, resolve_attendees};
pub use store::{load_stopwords, CandidateStats, CandidateStore, JsonCandidateStore, MemoryCandidateStore};
