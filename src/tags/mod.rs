//! Tag classification: dictionary loading, synonym index, classifier.

pub mod classifier;
pub mod index;
pub mod rules;

pub use classifier::classify;
pub use index::{normalize_token, token_counts, SynonymIndex};
pub use rules::TagRuleSource;
