//! Index reader traits consumed by the searchers.
//!
//! These are the storage collaborator contracts: an ordered, range-bounded
//! view of each field's term dictionary, and per-term posting lists ordered by
//! ascending document number. Readers are shared read-only across concurrent
//! queries.

use crate::error::Result;
use crate::lexical::core::terms::{DictionaryIterator, TermStats};

/// Per-field statistics used by similarity scorers.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStats {
    /// The field name.
    pub field: String,

    /// Number of unique terms in this field.
    pub unique_terms: u64,

    /// Total number of term occurrences.
    pub total_terms: u64,

    /// Number of documents with this field.
    pub doc_count: u64,

    /// Average field length.
    pub avg_length: f64,
}

/// Trait for index readers.
pub trait IndexReader: Send + Sync + std::fmt::Debug {
    /// Get the number of documents in the index.
    fn doc_count(&self) -> u64;

    /// Open an iterator over the terms of `field` in `[lower, upper)`.
    ///
    /// `upper = None` leaves the range unbounded above.
    fn dictionary_iterator(
        &self,
        field: &str,
        lower: &[u8],
        upper: Option<&[u8]>,
    ) -> Result<Box<dyn DictionaryIterator>>;

    /// Get statistics for a single term, if it is indexed.
    fn term_stats(&self, field: &str, term: &[u8]) -> Result<Option<TermStats>>;

    /// Get the posting list for a field and term.
    fn postings(&self, field: &str, term: &[u8]) -> Result<Option<Box<dyn PostingIterator>>>;

    /// Get field statistics.
    fn field_stats(&self, field: &str) -> Result<Option<FieldStats>>;

    /// Number of tokens `field` holds in document `doc_id`, when norms are stored.
    fn field_length(&self, field: &str, doc_id: u64) -> Option<u64> {
        let _ = (field, doc_id);
        None
    }
}

/// Iterator over a posting list.
///
/// A fresh iterator is positioned before its first posting; `next` or
/// `skip_to` must succeed before `doc_id` and `term_freq` are meaningful.
pub trait PostingIterator: Send + std::fmt::Debug {
    /// Get the current document ID.
    fn doc_id(&self) -> u64;

    /// Get the term frequency in the current document.
    fn term_freq(&self) -> u64;

    /// Move to the next document.
    fn next(&mut self) -> Result<bool>;

    /// Skip to the first document >= target.
    fn skip_to(&mut self, target: u64) -> Result<bool>;

    /// Get the cost of iterating through this posting list.
    fn cost(&self) -> u64;

    /// Tokens in the current document's field, when norms are stored.
    fn field_length(&self) -> Option<u64> {
        None
    }

    /// Release the resources held by this iterator.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
