//! Disjunction (OR) over child searchers.
//!
//! Children are merged with a binary min-heap keyed by each child's current
//! document number. Every child sitting on the smallest document contributes
//! to that document's score; the others are left where they are.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use crate::error::{Result, SearchError};
use crate::search::context::SearchContext;
use crate::search::document_match::DocumentMatch;
use crate::search::scoring::{CompositeScorer, TermContribution};
use crate::search::searcher::{ScoreMode, Searcher, SearcherOptions};

/// A child's position in the merge heap.
#[derive(Debug, PartialEq, Eq)]
struct HeapEntry {
    doc: u64,
    child: usize,
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: lower doc IDs come first
        other
            .doc
            .cmp(&self.doc)
            .then_with(|| other.child.cmp(&self.child))
    }
}

/// Union of its children's matches, scored by a [`CompositeScorer`].
#[derive(Debug)]
pub struct DisjunctionSearcher {
    children: Vec<Box<dyn Searcher>>,
    weights: Vec<f64>,
    /// The match each child is currently positioned on.
    currs: Vec<Option<DocumentMatch>>,
    heap: BinaryHeap<HeapEntry>,
    composite: Arc<dyn CompositeScorer>,
    options: SearcherOptions,
    initialized: bool,
    matching: Vec<usize>,
    contributions: Vec<TermContribution>,
    pool_size: usize,
    closed: bool,
}

impl DisjunctionSearcher {
    /// Merge `children`, the i-th child contributing with `weights[i]`.
    ///
    /// On a length mismatch the children are closed before the error is
    /// returned.
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
                tracing::warn!(error = %e, "failed to close children of rejected disjunction");
            }
            return Err(error);
        }

        let pool_size = children
            .iter()
            .map(|c| c.document_match_pool_size())
            .sum::<usize>()
            + 1;
        let n = children.len();

        Ok(DisjunctionSearcher {
            children,
            weights,
            currs: (0..n).map(|_| None).collect(),
            heap: BinaryHeap::with_capacity(n),
            composite,
            options: options.clone(),
            initialized: false,
            matching: Vec::with_capacity(n),
            contributions: Vec::with_capacity(n),
            pool_size,
            closed: false,
        })
    }

    /// Number of child searchers.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether there are no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn initialize(&mut self, ctx: &mut SearchContext) -> Result<()> {
        self.initialized = true;
        for (i, child) in self.children.iter_mut().enumerate() {
            if let Some(dm) = child.next(ctx)? {
                self.heap.push(HeapEntry {
                    doc: dm.number,
                    child: i,
                });
                self.currs[i] = Some(dm);
            }
        }
        Ok(())
    }
}

impl Searcher for DisjunctionSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if self.closed {
            return Ok(None);
        }
        if !self.initialized {
            self.initialize(ctx)?;
        }

        let Some(top) = self.heap.pop() else {
            return Ok(None);
        };
        let doc = top.doc;

        self.matching.clear();
        self.matching.push(top.child);
        while self.heap.peek().is_some_and(|entry| entry.doc == doc) {
            if let Some(entry) = self.heap.pop() {
                self.matching.push(entry.child);
            }
        }
        // Contributions are folded in term order, whatever order the heap popped them.
        self.matching.sort_unstable();

        self.contributions.clear();
        for &i in &self.matching {
            if let Some(mut dm) = self.currs[i].take() {
                self.contributions.push(TermContribution {
                    clause: i,
                    score: dm.score,
                    weight: self.weights[i],
                    explanation: dm.explanation.take(),
                });
                ctx.document_match_pool.put(dm);
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

        for &i in &self.matching {
            if let Some(dm) = self.children[i].next(ctx)? {
                self.heap.push(HeapEntry {
                    doc: dm.number,
                    child: i,
                });
                self.currs[i] = Some(dm);
            }
        }

        Ok(Some(result))
    }

    fn advance(&mut self, ctx: &mut SearchContext, target: u64) -> Result<Option<DocumentMatch>> {
        if self.closed {
            return Ok(None);
        }
        if !self.initialized {
            self.initialize(ctx)?;
        }

        while self.heap.peek().is_some_and(|entry| entry.doc < target) {
            let Some(entry) = self.heap.pop() else {
                break;
            };
            if let Some(dm) = self.currs[entry.child].take() {
                ctx.document_match_pool.put(dm);
            }
            if let Some(dm) = self.children[entry.child].advance(ctx, target)? {
                self.heap.push(HeapEntry {
                    doc: dm.number,
                    child: entry.child,
                });
                self.currs[entry.child] = Some(dm);
            }
        }

        self.next(ctx)
    }

    fn document_match_pool_size(&self) -> usize {
        self.pool_size
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.heap.clear();
        self.currs.iter_mut().for_each(|c| *c = None);
        close_all(&mut self.children)
    }
}

/// Close every searcher, returning the first failure.
///
/// A failing child never stops the remaining children from being closed.
pub(crate) fn close_all(children: &mut [Box<dyn Searcher>]) -> Result<()> {
    let mut first_error = None;
    for (i, child) in children.iter_mut().enumerate() {
        if let Err(e) = child.close() {
            if first_error.is_none() {
                first_error = Some(e);
            } else {
                tracing::warn!(child = i, error = %e, "additional failure closing child searcher");
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}
