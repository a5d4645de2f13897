//! In-memory index for testing and embedding.
//!
//! [`MemoryIndex`] keeps one ordered term dictionary per field, so dictionary
//! range scans come back in ascending byte order exactly as an on-disk
//! dictionary would. It also records how many dictionary and posting
//! iterators are open, which lets tests check that searchers release every
//! iterator exactly once.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::error::{Result, SearchError};
use crate::lexical::core::terms::{DictionaryIterator, TermStats};
use crate::lexical::reader::{FieldStats, IndexReader, PostingIterator};

/// A single posting in a posting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Document ID.
    pub doc_id: u64,
    /// Term frequency in the document.
    pub frequency: u32,
}

/// A posting list for a specific term.
#[derive(Debug, Clone)]
pub struct PostingList {
    /// Postings sorted by document ID.
    pub postings: Arc<[Posting]>,
    /// Total frequency across all documents.
    pub total_frequency: u64,
}

impl PostingList {
    /// Document frequency (number of documents containing this term).
    pub fn doc_frequency(&self) -> u64 {
        self.postings.len() as u64
    }
}

/// Open/close counters shared by a [`MemoryIndex`] and its iterators.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IteratorCounts {
    /// Dictionary iterators opened.
    pub dictionaries_opened: usize,
    /// Dictionary iterators closed.
    pub dictionaries_closed: usize,
    /// Posting iterators opened.
    pub postings_opened: usize,
    /// Posting iterators closed.
    pub postings_closed: usize,
}

impl IteratorCounts {
    /// Number of iterators opened and not yet closed.
    pub fn open(&self) -> usize {
        (self.dictionaries_opened - self.dictionaries_closed)
            + (self.postings_opened - self.postings_closed)
    }
}

#[derive(Debug, Default)]
struct FieldIndex {
    terms: BTreeMap<Vec<u8>, PostingList>,
    lengths: Arc<AHashMap<u64, u64>>,
    total_terms: u64,
}

/// Builder collecting tokenized documents into a [`MemoryIndex`].
#[derive(Debug, Default)]
pub struct MemoryIndexBuilder {
    fields: AHashMap<String, BTreeMap<Vec<u8>, BTreeMap<u64, u32>>>,
    lengths: AHashMap<String, AHashMap<u64, u64>>,
    docs: BTreeSet<u64>,
}

impl MemoryIndexBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index pre-tokenized terms for `field` of document `doc_id`.
    pub fn add_tokens<I, T>(mut self, doc_id: u64, field: &str, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let terms = self.fields.entry(field.to_string()).or_default();
        let mut length = 0u64;
        for token in tokens {
            *terms
                .entry(token.as_ref().to_vec())
                .or_default()
                .entry(doc_id)
                .or_default() += 1;
            length += 1;
        }
        *self
            .lengths
            .entry(field.to_string())
            .or_default()
            .entry(doc_id)
            .or_default() += length;
        self.docs.insert(doc_id);
        self
    }

    /// Index `text` split on whitespace.
    pub fn add_text(self, doc_id: u64, field: &str, text: &str) -> Self {
        self.add_tokens(doc_id, field, text.split_whitespace())
    }

    /// Freeze the collected documents.
    pub fn build(self) -> MemoryIndex {
        let mut lengths = self.lengths;
        let fields = self
            .fields
            .into_iter()
            .map(|(name, terms)| {
                let field_lengths = lengths.remove(&name).unwrap_or_default();
                let total_terms = field_lengths.values().sum();
                let terms = terms
                    .into_iter()
                    .map(|(term, docs)| {
                        let postings: Vec<Posting> = docs
                            .into_iter()
                            .map(|(doc_id, frequency)| Posting { doc_id, frequency })
                            .collect();
                        let total_frequency = postings.iter().map(|p| p.frequency as u64).sum();
                        (
                            term,
                            PostingList {
                                postings: postings.into(),
                                total_frequency,
                            },
                        )
                    })
                    .collect();
                (
                    name,
                    FieldIndex {
                        terms,
                        lengths: Arc::new(field_lengths),
                        total_terms,
                    },
                )
            })
            .collect();

        MemoryIndex {
            fields,
            doc_count: self.docs.len() as u64,
            counts: Arc::new(Mutex::new(IteratorCounts::default())),
        }
    }
}

/// An immutable in-memory index snapshot.
#[derive(Debug)]
pub struct MemoryIndex {
    fields: AHashMap<String, FieldIndex>,
    doc_count: u64,
    counts: Arc<Mutex<IteratorCounts>>,
}

impl MemoryIndex {
    /// Start building an index.
    pub fn builder() -> MemoryIndexBuilder {
        MemoryIndexBuilder::new()
    }

    /// Snapshot of the iterator open/close counters.
    pub fn iterator_counts(&self) -> IteratorCounts {
        *self.counts.lock()
    }

    /// Number of iterators currently open against this index.
    pub fn open_iterators(&self) -> usize {
        self.iterator_counts().open()
    }

    /// Document IDs containing `term` in `field`.
    pub fn doc_ids(&self, field: &str, term: &[u8]) -> Vec<u64> {
        self.fields
            .get(field)
            .and_then(|f| f.terms.get(term))
            .map(|list| list.postings.iter().map(|p| p.doc_id).collect())
            .unwrap_or_default()
    }
}

impl IndexReader for MemoryIndex {
    fn doc_count(&self) -> u64 {
        self.doc_count
    }

    fn dictionary_iterator(
        &self,
        field: &str,
        lower: &[u8],
        upper: Option<&[u8]>,
    ) -> Result<Box<dyn DictionaryIterator>> {
        let terms: Vec<TermStats> = match self.fields.get(field) {
            // BTreeMap::range panics on an inverted range.
            Some(_) if upper.is_some_and(|upper| upper <= lower) => Vec::new(),
            Some(index) => {
                let end = upper.map_or(Bound::Unbounded, Bound::Excluded);
                index
                    .terms
                    .range::<[u8], _>((Bound::Included(lower), end))
                    .map(|(term, list)| {
                        TermStats::new(term.clone(), list.doc_frequency(), list.total_frequency)
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        self.counts.lock().dictionaries_opened += 1;
        Ok(Box::new(MemoryDictionaryIterator {
            terms: terms.into_iter(),
            counts: self.counts.clone(),
            closed: false,
        }))
    }

    fn term_stats(&self, field: &str, term: &[u8]) -> Result<Option<TermStats>> {
        Ok(self
            .fields
            .get(field)
            .and_then(|f| f.terms.get(term))
            .map(|list| TermStats::new(term, list.doc_frequency(), list.total_frequency)))
    }

    fn postings(&self, field: &str, term: &[u8]) -> Result<Option<Box<dyn PostingIterator>>> {
        let Some(index) = self.fields.get(field) else {
            return Ok(None);
        };
        let Some(list) = index.terms.get(term) else {
            return Ok(None);
        };

        self.counts.lock().postings_opened += 1;
        Ok(Some(Box::new(MemoryPostingIterator {
            postings: list.postings.clone(),
            lengths: index.lengths.clone(),
            position: None,
            counts: self.counts.clone(),
            closed: false,
        })))
    }

    fn field_stats(&self, field: &str) -> Result<Option<FieldStats>> {
        Ok(self.fields.get(field).map(|index| {
            let doc_count = index.lengths.len() as u64;
            let avg_length = if doc_count == 0 {
                0.0
            } else {
                index.total_terms as f64 / doc_count as f64
            };
            FieldStats {
                field: field.to_string(),
                unique_terms: index.terms.len() as u64,
                total_terms: index.total_terms,
                doc_count,
                avg_length,
            }
        }))
    }

    fn field_length(&self, field: &str, doc_id: u64) -> Option<u64> {
        self.fields
            .get(field)
            .and_then(|index| index.lengths.get(&doc_id).copied())
    }
}

/// Dictionary range iterator over a [`MemoryIndex`] field.
#[derive(Debug)]
pub struct MemoryDictionaryIterator {
    terms: std::vec::IntoIter<TermStats>,
    counts: Arc<Mutex<IteratorCounts>>,
    closed: bool,
}

impl DictionaryIterator for MemoryDictionaryIterator {
    fn next(&mut self) -> Result<Option<TermStats>> {
        if self.closed {
            return Err(SearchError::iterator("dictionary iterator used after close"));
        }
        Ok(self.terms.next())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(SearchError::close("dictionary iterator already closed"));
        }
        self.closed = true;
        self.counts.lock().dictionaries_closed += 1;
        Ok(())
    }
}

/// Posting iterator over a [`MemoryIndex`] posting list.
#[derive(Debug)]
pub struct MemoryPostingIterator {
    postings: Arc<[Posting]>,
    lengths: Arc<AHashMap<u64, u64>>,
    position: Option<usize>,
    counts: Arc<Mutex<IteratorCounts>>,
    closed: bool,
}

impl MemoryPostingIterator {
    fn current(&self) -> Option<&Posting> {
        self.position.and_then(|i| self.postings.get(i))
    }
}

impl PostingIterator for MemoryPostingIterator {
    fn doc_id(&self) -> u64 {
        self.current().map_or(u64::MAX, |p| p.doc_id)
    }

    fn term_freq(&self) -> u64 {
        self.current().map_or(0, |p| p.frequency as u64)
    }

    fn next(&mut self) -> Result<bool> {
        if self.closed {
            return Err(SearchError::iterator("posting iterator used after close"));
        }
        let next = self.position.map_or(0, |i| i + 1).min(self.postings.len());
        self.position = Some(next);
        Ok(next < self.postings.len())
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.closed {
            return Err(SearchError::iterator("posting iterator used after close"));
        }
        let start = self.position.unwrap_or(0).min(self.postings.len());
        let offset = self.postings[start..].partition_point(|p| p.doc_id < target);
        self.position = Some(start + offset);
        Ok(start + offset < self.postings.len())
    }

    fn cost(&self) -> u64 {
        self.postings.len() as u64
    }

    fn field_length(&self) -> Option<u64> {
        self.current()
            .and_then(|p| self.lengths.get(&p.doc_id).copied())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(SearchError::close("posting iterator already closed"));
        }
        self.closed = true;
        self.counts.lock().postings_closed += 1;
        Ok(())
    }
}
