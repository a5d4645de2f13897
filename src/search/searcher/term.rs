//! Single-term searcher over one posting list.

use std::sync::Arc;

use crate::error::Result;
use crate::lexical::core::terms::TermStats;
use crate::lexical::reader::{IndexReader, PostingIterator};
use crate::search::context::SearchContext;
use crate::search::document_match::DocumentMatch;
use crate::search::scoring::{
    BM25Scorer, CollectionStats, CompositeScorer, ScoreInput, Scorer, TermContribution,
};
use crate::search::searcher::{ScoreMode, Searcher, SearcherOptions};

/// Composite scoring applied by a term searcher that stands in for a
/// one-term expansion.
#[derive(Debug, Clone)]
struct LoneClause {
    composite: Arc<dyn CompositeScorer>,
    weight: f64,
}

/// Yields the documents of one term's posting list, scored by a [`Scorer`].
#[derive(Debug)]
pub struct TermSearcher {
    stats: TermStats,
    collection: CollectionStats,
    boost: f64,
    scorer: Arc<dyn Scorer>,
    options: SearcherOptions,
    postings: Option<Box<dyn PostingIterator>>,
    lone_clause: Option<LoneClause>,
    started: bool,
    exhausted: bool,
}

impl TermSearcher {
    /// Open the posting list of `term` in `field`.
    ///
    /// A term absent from the dictionary produces a searcher that is exhausted
    /// from the start. `scorer = None` scores with BM25.
    pub fn new(
        reader: &dyn IndexReader,
        term: &[u8],
        field: &str,
        boost: f64,
        scorer: Option<Arc<dyn Scorer>>,
        options: &SearcherOptions,
    ) -> Result<Self> {
        let stats = reader
            .term_stats(field, term)?
            .unwrap_or_else(|| TermStats::new(term, 0, 0));
        let field_stats = reader.field_stats(field)?;
        let collection = CollectionStats {
            doc_count: reader.doc_count(),
            field_doc_count: field_stats.as_ref().map_or(0, |s| s.doc_count),
            avg_field_length: field_stats.as_ref().map_or(0.0, |s| s.avg_length),
        };
        let postings = reader.postings(field, term)?;

        Ok(TermSearcher {
            stats,
            collection,
            boost,
            scorer: scorer.unwrap_or_else(|| Arc::new(BM25Scorer::default())),
            options: options.clone(),
            exhausted: postings.is_none(),
            postings,
            lone_clause: None,
            started: false,
        })
    }

    /// Fold every score through `composite` as a single contribution of
    /// `weight`, so a one-term expansion scores like the merged path.
    pub fn with_composite(mut self, composite: Arc<dyn CompositeScorer>, weight: f64) -> Self {
        self.lone_clause = Some(LoneClause { composite, weight });
        self
    }

    /// The term's dictionary statistics.
    pub fn term_stats(&self) -> &TermStats {
        &self.stats
    }

    /// Estimated number of matches.
    pub fn count(&self) -> u64 {
        self.postings.as_ref().map_or(0, |p| p.cost())
    }

    fn current_match(&self, ctx: &mut SearchContext) -> Option<DocumentMatch> {
        let postings = self.postings.as_ref()?;
        let input = ScoreInput {
            collection: &self.collection,
            term: &self.stats,
            term_freq: postings.term_freq(),
            field_length: postings.field_length(),
            boost: self.boost,
        };

        let mut dm = ctx.document_match_pool.get();
        dm.number = postings.doc_id();
        if self.options.score == ScoreMode::None {
            return Some(dm);
        }

        dm.score = self.scorer.score(&input);
        if self.options.explain {
            dm.explanation = Some(self.scorer.explain(&input));
        }

        if let Some(lone) = &self.lone_clause {
            let contribution = [TermContribution {
                clause: 0,
                score: dm.score,
                weight: lone.weight,
                explanation: dm.explanation.take(),
            }];
            dm.score = lone.composite.score_composite(&contribution);
            if self.options.explain {
                dm.explanation = Some(lone.composite.explain_composite(&contribution));
            }
        }
        Some(dm)
    }
}

impl Searcher for TermSearcher {
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>> {
        if self.exhausted {
            return Ok(None);
        }
        let Some(postings) = self.postings.as_mut() else {
            return Ok(None);
        };

        self.started = true;
        if !postings.next()? {
            self.exhausted = true;
            return Ok(None);
        }
        Ok(self.current_match(ctx))
    }

    fn advance(&mut self, ctx: &mut SearchContext, target: u64) -> Result<Option<DocumentMatch>> {
        if self.exhausted {
            return Ok(None);
        }
        let Some(postings) = self.postings.as_mut() else {
            return Ok(None);
        };

        // The current document was already returned; never hand it out twice.
        if self.started && postings.doc_id() >= target {
            return self.next(ctx);
        }

        self.started = true;
        if !postings.skip_to(target)? {
            self.exhausted = true;
            return Ok(None);
        }
        Ok(self.current_match(ctx))
    }

    fn document_match_pool_size(&self) -> usize {
        1
    }

    fn close(&mut self) -> Result<()> {
        self.exhausted = true;
        match self.postings.take() {
            Some(mut postings) => postings.close(),
            None => Ok(()),
        }
    }
}
