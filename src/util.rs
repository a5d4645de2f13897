//! Shared utility modules used by the term enumerators.

pub mod bytes;
pub mod levenshtein;
