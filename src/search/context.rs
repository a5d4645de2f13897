//! Per-query execution state.

use crate::search::document_match::DocumentMatchPool;
use crate::search::searcher::Searcher;

/// Mutable state threaded through every [`Searcher::next`] call of one query.
///
/// A context belongs to exactly one query and one thread at a time; searchers
/// borrow it mutably for the duration of each call.
#[derive(Debug)]
pub struct SearchContext {
    /// Pool the searchers draw their matches from.
    pub document_match_pool: DocumentMatchPool,
}

impl SearchContext {
    /// Create a context with a pool of `pool_size` matches.
    pub fn new(pool_size: usize) -> Self {
        SearchContext {
            document_match_pool: DocumentMatchPool::new(pool_size),
        }
    }

    /// Create a context whose pool is sized for `searcher`.
    pub fn for_searcher(searcher: &dyn Searcher) -> Self {
        Self::new(searcher.document_match_pool_size())
    }
}
