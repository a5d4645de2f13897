//! Building one searcher over a set of expanded terms.

use std::sync::Arc;

use crate::error::{Result, SearchError};
use crate::lexical::reader::IndexReader;
use crate::search::scoring::{CompositeScorer, Scorer};
use crate::search::searcher::conjunction::ConjunctionSearcher;
use crate::search::searcher::disjunction::{DisjunctionSearcher, close_all};
use crate::search::searcher::match_none::MatchNoneSearcher;
use crate::search::searcher::term::TermSearcher;
use crate::search::searcher::{Searcher, SearcherOptions};

/// Combine the posting lists of `terms` in `field` into one searcher.
///
/// `weights[i]` is handed to `composite` alongside the score of `terms[i]`.
/// Zero terms give a [`MatchNoneSearcher`], one term a [`TermSearcher`], and
/// more terms a [`DisjunctionSearcher`] (or a [`ConjunctionSearcher`] when
/// `is_disjunction` is false) with one term searcher per term.
#[allow(clippy::too_many_arguments)]
pub fn new_multi_term_searcher<T: AsRef<[u8]>>(
    reader: &dyn IndexReader,
    terms: &[T],
    weights: &[f64],
    field: &str,
    boost: f64,
    scorer: Option<Arc<dyn Scorer>>,
    composite: Arc<dyn CompositeScorer>,
    options: &SearcherOptions,
    is_disjunction: bool,
) -> Result<Box<dyn Searcher>> {
    if terms.len() != weights.len() {
        return Err(SearchError::invalid_parameter(format!(
            "{} terms but {} weights",
            terms.len(),
            weights.len()
        )));
    }
    options.clause_guard().check(field, terms.len())?;

    match terms {
        [] => return Ok(Box::new(MatchNoneSearcher::new())),
        [term] => {
            let searcher = TermSearcher::new(reader, term.as_ref(), field, boost, scorer, options)?
                .with_composite(composite, weights[0]);
            return Ok(Box::new(searcher));
        }
        _ => {}
    }

    let mut children: Vec<Box<dyn Searcher>> = Vec::with_capacity(terms.len());
    for term in terms {
        match TermSearcher::new(reader, term.as_ref(), field, boost, scorer.clone(), options) {
            Ok(child) => children.push(Box::new(child)),
            Err(e) => {
                if let Err(close_error) = close_all(&mut children) {
                    tracing::warn!(
                        field,
                        error = %close_error,
                        "failed to close term searchers after a construction error"
                    );
                }
                return Err(e);
            }
        }
    }

    tracing::trace!(field, terms = children.len(), is_disjunction, "combining term searchers");

    let weights = weights.to_vec();
    if is_disjunction {
        Ok(Box::new(DisjunctionSearcher::new(children, weights, composite, options)?))
    } else {
        Ok(Box::new(ConjunctionSearcher::new(children, weights, composite, options)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::index::memory::MemoryIndex;
    use crate::search::context::SearchContext;
    use crate::search::scoring::{CompositeSumScorer, ConstantScorer, WeightedSumScorer};

    fn index() -> MemoryIndex {
        MemoryIndex::builder()
            .add_text(0, "desc", "water")
            .add_text(3, "desc", "waterfall water")
            .add_text(5, "desc", "waterloo")
            .build()
    }

    fn docs(searcher: &mut dyn Searcher) -> Vec<(u64, f64)> {
        let mut ctx = SearchContext::for_searcher(searcher);
        let mut out = Vec::new();
        while let Some(dm) = searcher.next(&mut ctx).unwrap() {
            out.push((dm.number, dm.score));
            ctx.document_match_pool.put(dm);
        }
        out
    }

    #[test]
    fn test_length_mismatch() {
        let index = index();
        let result = new_multi_term_searcher(
            &index,
            &["water", "waterloo"],
            &[1.0],
            "desc",
            1.0,
            None,
            Arc::new(CompositeSumScorer::new()),
            &SearcherOptions::default(),
            true,
        );
        assert!(matches!(result, Err(SearchError::InvalidParameter(_))));
        assert_eq!(index.iterator_counts().postings_opened, 0);
    }

    #[test]
    fn test_no_terms_matches_nothing() {
        let index = index();
        let mut searcher = new_multi_term_searcher::<&str>(
            &index,
            &[],
            &[],
            "desc",
            1.0,
            None,
            Arc::new(CompositeSumScorer::new()),
            &SearcherOptions::default(),
            true,
        )
        .unwrap();
        assert_eq!(searcher.document_match_pool_size(), 0);
        assert!(docs(searcher.as_mut()).is_empty());
        searcher.close().unwrap();
    }

    #[test]
    fn test_single_term_scores_like_merged_path() {
        let index = index();
        let composite: Arc<dyn CompositeScorer> = Arc::new(WeightedSumScorer::new());
        let options = SearcherOptions::default();

        let mut single = new_multi_term_searcher(
            &index,
            &["waterloo"],
            &[0.5],
            "desc",
            1.0,
            Some(Arc::new(ConstantScorer)),
            composite.clone(),
            &options,
            true,
        )
        .unwrap();
        assert_eq!(single.document_match_pool_size(), 1);
        assert_eq!(docs(single.as_mut()), vec![(5, 0.5)]);
        single.close().unwrap();

        let mut merged = new_multi_term_searcher(
            &index,
            &["waterloo", "absent"],
            &[0.5, 1.0],
            "desc",
            1.0,
            Some(Arc::new(ConstantScorer)),
            composite,
            &options,
            true,
        )
        .unwrap();
        assert_eq!(docs(merged.as_mut()), vec![(5, 0.5)]);
        merged.close().unwrap();
        assert_eq!(index.open_iterators(), 0);
    }

    #[test]
    fn test_disjunction_and_conjunction() {
        let index = index();
        let terms = ["water", "waterfall"];
        let weights = [1.0, 1.0];
        let build = |is_disjunction| {
            new_multi_term_searcher(
                &index,
                &terms,
                &weights,
                "desc",
                1.0,
                Some(Arc::new(ConstantScorer)),
                Arc::new(CompositeSumScorer::new()),
                &SearcherOptions::default(),
                is_disjunction,
            )
            .unwrap()
        };

        let mut or = build(true);
        assert_eq!(or.document_match_pool_size(), 3);
        assert_eq!(docs(or.as_mut()), vec![(0, 1.0), (3, 2.0)]);
        or.close().unwrap();

        let mut and = build(false);
        assert_eq!(docs(and.as_mut()), vec![(3, 2.0)]);
        and.close().unwrap();
        assert_eq!(index.open_iterators(), 0);
    }

    #[test]
    fn test_clause_guard_rechecked() {
        let index = index();
        let options = SearcherOptions::default().with_max_clause_count(2);
        let result = new_multi_term_searcher(
            &index,
            &["water", "waterfall", "waterloo"],
            &[1.0; 3],
            "desc",
            1.0,
            None,
            Arc::new(CompositeSumScorer::new()),
            &options,
            true,
        );
        match result {
            Err(SearchError::TooManyClauses { field, count, max }) => {
                assert_eq!(field, "desc");
                assert_eq!(count, 3);
                assert_eq!(max, 2);
            }
            other => panic!("expected TooManyClauses, got {other:?}"),
        }
        assert_eq!(index.iterator_counts().postings_opened, 0);
    }
}
