//! Term dictionary enumeration API.
//!
//! A [`DictionaryIterator`] walks the terms of one field in ascending byte
//! order within a `[lower, upper)` range, similar to Lucene's TermsEnum
//! restricted to a range. Storage engines implement it; the searchers in this
//! crate only consume it.

use std::fmt;

use crate::error::Result;

/// Statistics about a term in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermStats {
    /// The term bytes
    pub term: Vec<u8>,
    /// Number of documents containing this term
    pub doc_freq: u64,
    /// Total number of occurrences across all documents
    pub total_term_freq: u64,
}

impl TermStats {
    /// Create term statistics.
    pub fn new(term: impl Into<Vec<u8>>, doc_freq: u64, total_term_freq: u64) -> Self {
        TermStats {
            term: term.into(),
            doc_freq,
            total_term_freq,
        }
    }

    /// The term as text, replacing invalid UTF-8 sequences.
    pub fn term_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.term)
    }
}

/// Iterator over the terms of a field's dictionary.
///
/// Terms come back in ascending byte order. After `next` returns `Ok(None)`
/// it keeps returning `Ok(None)`.
pub trait DictionaryIterator: Send + fmt::Debug {
    /// Advance to the next term in the range.
    fn next(&mut self) -> Result<Option<TermStats>>;

    /// Release the resources held by this iterator.
    fn close(&mut self) -> Result<()>;
}

impl DictionaryIterator for Box<dyn DictionaryIterator> {
    fn next(&mut self) -> Result<Option<TermStats>> {
        (**self).next()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Scoped ownership of an open dictionary iterator.
///
/// The wrapped iterator is closed exactly once: either explicitly through
/// [`DictionaryScope::close`], which reports the close result, or on drop,
/// which covers early returns and `?` on error paths.
#[derive(Debug)]
pub struct DictionaryScope {
    inner: Option<Box<dyn DictionaryIterator>>,
}

impl DictionaryScope {
    /// Take ownership of an open iterator.
    pub fn new(inner: Box<dyn DictionaryIterator>) -> Self {
        DictionaryScope { inner: Some(inner) }
    }

    /// Advance the wrapped iterator.
    pub fn next(&mut self) -> Result<Option<TermStats>> {
        match self.inner.as_mut() {
            Some(inner) => inner.next(),
            None => Ok(None),
        }
    }

    /// Close the wrapped iterator and report the outcome.
    pub fn close(mut self) -> Result<()> {
        match self.inner.take() {
            Some(mut inner) => inner.close(),
            None => Ok(()),
        }
    }
}

impl Drop for DictionaryScope {
    fn drop(&mut self) {
        if let Some(mut inner) = self.inner.take()
            && let Err(e) = inner.close()
        {
            // The error that caused the early exit is the one the caller sees.
            tracing::warn!(error = %e, "failed to close dictionary iterator on error path");
        }
    }
}
