//! Levenshtein matching over a term dictionary.
//!
//! [`LevenshteinAutomaton`] decides whether a dictionary term lies within a
//! bounded edit distance of a query term, with an optional literal prefix that
//! must match byte for byte. [`AutomatonTermsEnum`] applies it to a dictionary
//! scan that has already been narrowed to the literal prefix.

use crate::error::{Result, SearchError};
use crate::lexical::core::terms::{DictionaryScope, TermStats};
use crate::util::levenshtein::term_distance_threshold;

/// A Levenshtein matcher for fuzzy term expansion.
///
/// This checks candidates with a bounded dynamic-programming distance rather
/// than compiling a DFA. The dictionary scan is limited to the literal prefix
/// before any distance is computed, so only the remainders are compared.
#[derive(Debug, Clone)]
pub struct LevenshteinAutomaton {
    /// The query term
    pattern: Vec<u8>,
    /// Maximum edit distance
    max_edits: u32,
    /// Number of leading bytes that must match exactly
    prefix_length: usize,
}

impl LevenshteinAutomaton {
    /// Create a new Levenshtein automaton.
    ///
    /// # Arguments
    ///
    /// * `pattern` - The query term
    /// * `max_edits` - Maximum edit distance
    /// * `prefix_length` - Required exact prefix length in bytes
    ///
    /// Fails when the prefix is longer than the pattern, or when it would cut a
    /// UTF-8 pattern in the middle of a character.
    pub fn new(pattern: impl Into<Vec<u8>>, max_edits: u32, prefix_length: usize) -> Result<Self> {
        let pattern = pattern.into();
        if prefix_length > pattern.len() {
            return Err(SearchError::invalid_parameter(format!(
                "prefix length {prefix_length} exceeds term length {}",
                pattern.len()
            )));
        }
        if let Ok(text) = std::str::from_utf8(&pattern)
            && !text.is_char_boundary(prefix_length)
        {
            return Err(SearchError::invalid_parameter(format!(
                "prefix length {prefix_length} splits a character of `{text}`"
            )));
        }

        Ok(LevenshteinAutomaton {
            pattern,
            max_edits,
            prefix_length,
        })
    }

    /// Edit distance between the candidate and the pattern, if within bounds.
    ///
    /// Returns `None` when the candidate does not carry the literal prefix or
    /// when its remainder is more than `max_edits` away.
    pub fn distance(&self, candidate: &[u8]) -> Option<u32> {
        let prefix = self.prefix();
        if !candidate.starts_with(prefix) {
            return None;
        }

        term_distance_threshold(
            &self.pattern[self.prefix_length..],
            &candidate[self.prefix_length..],
            self.max_edits as usize,
        )
        .map(|d| d as u32)
    }

    /// Check if a candidate term matches the automaton.
    pub fn matches(&self, candidate: &[u8]) -> bool {
        self.distance(candidate).is_some()
    }

    /// Get the pattern bytes.
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Get the maximum edit distance.
    pub fn max_edits(&self) -> u32 {
        self.max_edits
    }

    /// Get the prefix length.
    pub fn prefix_length(&self) -> usize {
        self.prefix_length
    }

    /// The literal prefix every accepted term starts with.
    pub fn prefix(&self) -> &[u8] {
        &self.pattern[..self.prefix_length]
    }
}

/// A dictionary scan filtered through a [`LevenshteinAutomaton`].
#[derive(Debug)]
pub struct AutomatonTermsEnum<'a> {
    /// The underlying scan, already narrowed to the automaton's prefix
    inner: &'a mut DictionaryScope,
    /// The automaton to filter with
    automaton: &'a LevenshteinAutomaton,
    /// Number of terms inspected so far
    visited: usize,
}

impl<'a> AutomatonTermsEnum<'a> {
    /// Create a new automaton terms enum.
    pub fn new(inner: &'a mut DictionaryScope, automaton: &'a LevenshteinAutomaton) -> Self {
        AutomatonTermsEnum {
            inner,
            automaton,
            visited: 0,
        }
    }

    /// Advance to the next accepted term, returning it with its edit distance.
    pub fn next(&mut self) -> Result<Option<(TermStats, u32)>> {
        while let Some(term_stats) = self.inner.next()? {
            self.visited += 1;
            if let Some(distance) = self.automaton.distance(&term_stats.term) {
                return Ok(Some((term_stats, distance)));
            }
        }
        Ok(None)
    }

    /// Number of dictionary terms inspected so far.
    pub fn visited(&self) -> usize {
        self.visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_automaton() {
        let automaton = LevenshteinAutomaton::new("hello", 1, 0).unwrap();

        assert!(automaton.matches(b"hello")); // exact match
        assert!(automaton.matches(b"helo")); // 1 deletion
        assert!(automaton.matches(b"hallo")); // 1 substitution
        assert!(automaton.matches(b"helllo")); // 1 insertion

        assert!(!automaton.matches(b"ehllo")); // transposition costs 2
        assert!(!automaton.matches(b"world")); // too different
        assert!(!automaton.matches(b"hi")); // too different
    }

    #[test]
    fn test_prefix_constraint() {
        let automaton = LevenshteinAutomaton::new("hello", 2, 2).unwrap();

        assert_eq!(automaton.prefix(), b"he");
        assert_eq!(automaton.distance(b"hello"), Some(0));
        assert_eq!(automaton.distance(b"heLLo"), Some(2));

        assert_eq!(automaton.distance(b"xello"), None); // prefix doesn't match
        assert_eq!(automaton.distance(b"world"), None);
    }

    #[test]
    fn test_distance_counts_only_remainder() {
        let automaton = LevenshteinAutomaton::new("water", 2, 3).unwrap();

        assert_eq!(automaton.distance(b"waterloo"), None);
        assert_eq!(automaton.distance(b"wateer"), Some(1));
        assert_eq!(automaton.distance(b"wat"), Some(2));
    }

    #[test]
    fn test_invalid_prefix_length() {
        assert!(LevenshteinAutomaton::new("abc", 1, 4).is_err());
        assert!(LevenshteinAutomaton::new("abc", 1, 3).is_ok());
        // "é" occupies bytes 1..3.
        assert!(LevenshteinAutomaton::new("réel", 1, 2).is_err());
        assert!(LevenshteinAutomaton::new("réel", 1, 3).is_ok());
    }
}
