//! Scored matches and the per-query reuse pool.

use serde::Serialize;

use crate::search::explanation::Explanation;

/// A document matched by a searcher, with its score.
///
/// Matches are handed out by a [`DocumentMatchPool`] and are expected to go
/// back to it with [`DocumentMatchPool::put`] once the caller is done. A match
/// that has been returned is reused in place; keep copies of the fields you
/// need, not the match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentMatch {
    /// Document number within the segment.
    pub number: u64,
    /// Relevance score.
    pub score: f64,
    /// How the score was computed, when explanations are requested.
    pub explanation: Option<Explanation>,
}

impl DocumentMatch {
    /// Clear all fields so the match can be handed out again.
    pub fn reset(&mut self) {
        self.number = 0;
        self.score = 0.0;
        self.explanation = None;
    }
}

/// Pool of reusable [`DocumentMatch`] values for one query.
///
/// Sized from the searcher tree's `document_match_pool_size`, so a correctly
/// sized pool never allocates while the query runs. An undersized pool keeps
/// working and allocates on demand.
#[derive(Debug)]
pub struct DocumentMatchPool {
    avail: Vec<DocumentMatch>,
    size: usize,
    allocated: usize,
}

impl DocumentMatchPool {
    /// Create a pool holding `size` preallocated matches.
    pub fn new(size: usize) -> Self {
        DocumentMatchPool {
            avail: (0..size).map(|_| DocumentMatch::default()).collect(),
            size,
            allocated: size,
        }
    }

    /// Take a cleared match from the pool.
    pub fn get(&mut self) -> DocumentMatch {
        match self.avail.pop() {
            Some(dm) => dm,
            None => {
                self.allocated += 1;
                tracing::trace!(
                    size = self.size,
                    allocated = self.allocated,
                    "document match pool exhausted, allocating"
                );
                DocumentMatch::default()
            }
        }
    }

    /// Return a match to the pool.
    pub fn put(&mut self, mut dm: DocumentMatch) {
        dm.reset();
        self.avail.push(dm);
    }

    /// Number of matches currently available without allocating.
    pub fn available(&self) -> usize {
        self.avail.len()
    }

    /// Size the pool was created with.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total matches this pool has created, including on-demand allocations.
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}
