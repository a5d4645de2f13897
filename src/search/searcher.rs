//! Searchers: lazy, ordered iteration over scored matches.
//!
//! Every searcher yields matches in strictly increasing document-number order
//! with no duplicates. Combinators built on top of this layer rely on that
//! order to merge in linear time.
//!
//! A caller drives a searcher with repeated [`Searcher::next`] calls against a
//! [`SearchContext`] sized from [`Searcher::document_match_pool_size`], returns
//! each match to the context's pool when done with it, and calls
//! [`Searcher::close`] once on every exit path.

pub mod conjunction;
pub mod disjunction;
pub mod fuzzy;
pub mod match_none;
pub mod multi_term;
pub mod prefix;
pub mod term;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::search::clause_guard::ClauseGuard;
use crate::search::context::SearchContext;
use crate::search::document_match::DocumentMatch;

pub use self::conjunction::ConjunctionSearcher;
pub use self::disjunction::DisjunctionSearcher;
pub use self::fuzzy::{MAX_FUZZINESS, enumerate_fuzzy_terms, fuzzy_weight, new_fuzzy_searcher};
pub use self::match_none::MatchNoneSearcher;
pub use self::multi_term::new_multi_term_searcher;
pub use self::prefix::{CandidateTerm, enumerate_prefix_terms, new_term_prefix_searcher};
pub use self::term::TermSearcher;

/// Trait for searchers.
pub trait Searcher: Send + Debug {
    /// Advance to the next match.
    ///
    /// Returns `Ok(None)` once exhausted, and keeps doing so on later calls.
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>>;

    /// Advance to the first match whose document number is `>= target`.
    fn advance(&mut self, ctx: &mut SearchContext, target: u64) -> Result<Option<DocumentMatch>> {
        while let Some(dm) = self.next(ctx)? {
            if dm.number >= target {
                return Ok(Some(dm));
            }
            ctx.document_match_pool.put(dm);
        }
        Ok(None)
    }

    /// Most matches this searcher and its children hold at once.
    fn document_match_pool_size(&self) -> usize;

    /// Release held iterators and child searchers.
    fn close(&mut self) -> Result<()>;
}

/// Whether term scorers run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// Score every match.
    #[default]
    Scored,
    /// Skip scoring; every match scores 0.
    None,
}

/// Options shared by every searcher of one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearcherOptions {
    /// Attach score explanations to matches.
    pub explain: bool,
    /// Whether to compute scores.
    pub score: ScoreMode,
    /// Clause ceiling for this query; `None` uses the process-wide value.
    pub max_clause_count: Option<usize>,
    /// Largest edit distance fuzzy searchers accept.
    pub max_fuzziness: u32,
}

impl Default for SearcherOptions {
    fn default() -> Self {
        SearcherOptions {
            explain: false,
            score: ScoreMode::Scored,
            max_clause_count: None,
            max_fuzziness: MAX_FUZZINESS,
        }
    }
}

impl SearcherOptions {
    /// Options that attach explanations.
    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    /// Options with a query-specific clause ceiling.
    pub fn with_max_clause_count(mut self, max: usize) -> Self {
        self.max_clause_count = Some(max);
        self
    }

    /// The clause guard to expand terms under.
    pub fn clause_guard(&self) -> ClauseGuard {
        match self.max_clause_count {
            Some(max) => ClauseGuard::new(max),
            None => ClauseGuard::from_global(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::document_match::DocumentMatch;

    #[derive(Debug)]
    struct ListSearcher {
        docs: std::vec::IntoIter<u64>,
    }

    impl Searcher for ListSearcher {
        fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
            Ok(self.docs.next().map(|number| {
                let mut dm = ctx.document_match_pool.get();
                dm.number = number;
                dm
            }))
        }

        fn document_match_pool_size(&self) -> usize {
            1
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_advance_returns_skipped_matches() {
        let mut searcher = ListSearcher {
            docs: vec![1, 3, 5, 8].into_iter(),
        };
        let mut ctx = SearchContext::for_searcher(&searcher);

        let dm = searcher.advance(&mut ctx, 4).unwrap().unwrap();
        assert_eq!(dm.number, 5);
        // The two skipped matches went back to the pool.
        assert_eq!(ctx.document_match_pool.available(), 0);
        assert_eq!(ctx.document_match_pool.allocated(), 1);
        ctx.document_match_pool.put(dm);

        assert!(searcher.advance(&mut ctx, 9).unwrap().is_none());
        assert!(searcher.next(&mut ctx).unwrap().is_none());
    }

    #[test]
    fn test_options_from_json() {
        let options: SearcherOptions =
            serde_json::from_str(r#"{"explain": true, "score": "none"}"#).unwrap();
        assert!(options.explain);
        assert_eq!(options.score, ScoreMode::None);
        assert_eq!(options.max_fuzziness, MAX_FUZZINESS);
        assert_eq!(
            SearcherOptions::default()
                .with_max_clause_count(7)
                .clause_guard()
                .max(),
            7
        );
    }
}
