//! Core data structures for term enumeration.
//!
//! - Term statistics and dictionary range iteration
//! - Levenshtein automaton for fuzzy term filtering

pub mod automaton;
pub mod terms;
