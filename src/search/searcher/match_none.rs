//! Searcher that matches nothing.

use crate::error::Result;
use crate::search::context::SearchContext;
use crate::search::document_match::DocumentMatch;
use crate::search::searcher::Searcher;

/// Returned when a term expansion finds no candidate terms.
#[derive(Debug, Default)]
pub struct MatchNoneSearcher;

impl MatchNoneSearcher {
    pub fn new() -> Self {
        MatchNoneSearcher
    }
}

impl Searcher for MatchNoneSearcher {
    fn next(&mut self, _ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        Ok(None)
    }

    fn advance(&mut self, _ctx: &mut SearchContext, _target: u64) -> Result<Option<DocumentMatch>> {
        Ok(None)
    }

    fn document_match_pool_size(&self) -> usize {
        0
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
