//! Conjunction (AND) over child searchers.

use std::sync::Arc;

use crate::error::{Result, SearchError};
use crate::search::context::SearchContext;
use crate::search::document_match::DocumentMatch;
use crate::search::scoring::{CompositeScorer, TermContribution};
use crate::search::searcher::disjunction::close_all;
use crate::search::searcher::{ScoreMode, Searcher, SearcherOptions};

/// Documents matched by every child, found by leapfrogging the children with
/// `advance` until they agree on a document.
#[derive(Debug)]
pub struct ConjunctionSearcher {
    children: Vec<Box<dyn Searcher>>,
    weights: Vec<f64>,
    currs: Vec<Option<DocumentMatch>>,
    composite: Arc<dyn CompositeScorer>,
    options: SearcherOptions,
    initialized: bool,
    exhausted: bool,
    contributions: Vec<TermContribution>,
    pool_size: usize,
    closed: bool,
}

impl ConjunctionSearcher {
    /// Intersect `children`, the i-th child contributing with `weights[i]`.
    pub fn new(
        mut children: Vec<Box<dyn Searcher>>,
        weights: Vec<f64>,
        composite: Arc<dyn CompositeScorer>,
        options: &SearcherOptions,
    ) -> Result<Self> {
        if children.len() != weights.len() {
            let error = SearchError::invalid_parameter(format!(
                "{} child searchers but {} weights",
                children.len(),
                weights.len()
            ));
            if let Err(e) = close_all(&mut children) {
                tracing::warn!(error = %e, "failed to close children of rejected conjunction");
            }
            return Err(error);
        }

        let pool_size = children
            .iter()
            .map(|c| c.document_match_pool_size())
            .sum::<usize>()
            + 1;
        let n = children.len();

        Ok(ConjunctionSearcher {
            children,
            weights,
            currs: (0..n).map(|_| None).collect(),
            composite,
            options: options.clone(),
            initialized: false,
            exhausted: n == 0,
            contributions: Vec::with_capacity(n),
            pool_size,
            closed: false,
        })
    }

    fn finish(&mut self, ctx: &mut SearchContext) {
        self.exhausted = true;
        for dm in self.currs.iter_mut().filter_map(Option::take) {
            ctx.document_match_pool.put(dm);
        }
    }

    /// Move child `i` to its first match `>= target`, or past its current
    /// match when `target` is `None`. Returns false once the child runs dry.
    fn step(&mut self, ctx: &mut SearchContext, i: usize, target: Option<u64>) -> Result<bool> {
        if let Some(dm) = self.currs[i].take() {
            ctx.document_match_pool.put(dm);
        }
        let next = match target {
            Some(target) => self.children[i].advance(ctx, target)?,
            None => self.children[i].next(ctx)?,
        };
        let found = next.is_some();
        self.currs[i] = next;
        Ok(found)
    }

    /// Leapfrog until every child sits on the same document.
    fn align(&mut self, ctx: &mut SearchContext) -> Result<Option<u64>> {
        loop {
            let Some(max) = self.currs.iter().flatten().map(|dm| dm.number).max() else {
                return Ok(None);
            };

            let mut aligned = true;
            for i in 0..self.children.len() {
                let behind = self.currs[i].as_ref().is_some_and(|dm| dm.number < max);
                if behind {
                    if !self.step(ctx, i, Some(max))? {
                        return Ok(None);
                    }
                    if self.currs[i].as_ref().is_some_and(|dm| dm.number != max) {
                        aligned = false;
                    }
                }
            }

            if aligned {
                return Ok(Some(max));
            }
        }
    }

    fn position(&mut self, ctx: &mut SearchContext, target: Option<u64>) -> Result<Option<DocumentMatch>> {
        if self.closed || self.exhausted {
            return Ok(None);
        }

        if !self.initialized {
            self.initialized = true;
            for i in 0..self.children.len() {
                if !self.step(ctx, i, target)? {
                    self.finish(ctx);
                    return Ok(None);
                }
            }
        } else {
            // All children sit on the last returned document; move the first past it.
            let target = target.filter(|&t| self.currs[0].as_ref().is_some_and(|dm| dm.number < t));
            if !self.step(ctx, 0, target)? {
                self.finish(ctx);
                return Ok(None);
            }
        }

        let Some(doc) = self.align(ctx)? else {
            self.finish(ctx);
            return Ok(None);
        };

        self.contributions.clear();
        for (i, curr) in self.currs.iter_mut().enumerate() {
            if let Some(dm) = curr.as_mut() {
                self.contributions.push(TermContribution {
                    clause: i,
                    score: dm.score,
                    weight: self.weights[i],
                    explanation: dm.explanation.take(),
                });
            }
        }

        let mut result = ctx.document_match_pool.get();
        result.number = doc;
        if self.options.score != ScoreMode::None {
            result.score = self.composite.score_composite(&self.contributions);
            if self.options.explain {
                result.explanation = Some(self.composite.explain_composite(&self.contributions));
            }
        }
        Ok(Some(result))
    }
}

impl Searcher for ConjunctionSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        self.position(ctx, None)
    }

    fn advance(&mut self, ctx: &mut SearchContext, target: u64) -> Result<Option<DocumentMatch>> {
        self.position(ctx, Some(target))
    }

    fn document_match_pool_size(&self) -> usize {
        self.pool_size
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.currs.iter_mut().for_each(|c| *c = None);
        close_all(&mut self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::index::memory::MemoryIndex;
    use crate::search::scoring::{CompositeSumScorer, ConstantScorer};
    use crate::search::searcher::term::TermSearcher;

    fn index() -> MemoryIndex {
        MemoryIndex::builder()
            .add_text(1, "desc", "water beet")
            .add_text(2, "desc", "water")
            .add_text(4, "desc", "beet water waterfall")
            .add_text(7, "desc", "beet")
            .add_text(8, "desc", "water beet waterfall")
            .build()
    }

    fn searcher(index: &MemoryIndex, terms: &[&str]) -> ConjunctionSearcher {
        let options = SearcherOptions::default();
        let children: Vec<Box<dyn Searcher>> = terms
            .iter()
            .map(|t| {
                Box::new(
                    TermSearcher::new(
                        index,
                        t.as_bytes(),
                        "desc",
                        1.0,
                        Some(Arc::new(ConstantScorer)),
                        &options,
                    )
                    .unwrap(),
                ) as Box<dyn Searcher>
            })
            .collect();
        let weights = vec![1.0; children.len()];
        ConjunctionSearcher::new(children, weights, Arc::new(CompositeSumScorer::new()), &options)
            .unwrap()
    }

    #[test]
    fn test_intersection() {
        let index = index();
        let mut searcher = searcher(&index, &["water", "beet"]);
        assert_eq!(searcher.document_match_pool_size(), 3);
        let mut ctx = SearchContext::for_searcher(&searcher);

        let mut results = Vec::new();
        while let Some(dm) = searcher.next(&mut ctx).unwrap() {
            results.push((dm.number, dm.score));
            ctx.document_match_pool.put(dm);
        }
        assert_eq!(results, vec![(1, 2.0), (4, 2.0), (8, 2.0)]);
        assert_eq!(ctx.document_match_pool.allocated(), 3);

        searcher.close().unwrap();
        assert_eq!(index.open_iterators(), 0);
    }

    #[test]
    fn test_advance() {
        let index = index();
        let mut searcher = searcher(&index, &["water", "beet", "waterfall"]);
        let mut ctx = SearchContext::for_searcher(&searcher);

        let dm = searcher.advance(&mut ctx, 2).unwrap().unwrap();
        assert_eq!((dm.number, dm.score), (4, 3.0));
        ctx.document_match_pool.put(dm);

        let dm = searcher.advance(&mut ctx, 5).unwrap().unwrap();
        assert_eq!(dm.number, 8);
        ctx.document_match_pool.put(dm);

        assert!(searcher.next(&mut ctx).unwrap().is_none());
        assert!(searcher.next(&mut ctx).unwrap().is_none());
        searcher.close().unwrap();
        assert_eq!(index.open_iterators(), 0);
    }

    #[test]
    fn test_disjoint_children() {
        let index = index();
        let mut searcher = searcher(&index, &["waterfall", "nothing"]);
        let mut ctx = SearchContext::for_searcher(&searcher);
        assert!(searcher.next(&mut ctx).unwrap().is_none());
        searcher.close().unwrap();
        assert_eq!(index.open_iterators(), 0);
    }
}
