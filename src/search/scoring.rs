//! Scoring for expanded terms.
//!
//! Two pluggable strategies meet here:
//! - [`Scorer`]: scores one term's occurrence in one document (BM25 by default)
//! - [`composite::CompositeScorer`]: folds the per-term contributions of a
//!   document matched by several expanded terms into one score

pub mod bm25;
pub mod composite;

use std::fmt::Debug;

use crate::lexical::core::terms::TermStats;
use crate::search::explanation::Explanation;

pub use self::bm25::BM25Scorer;
pub use self::composite::{CompositeScorer, CompositeSumScorer, TermContribution, WeightedSumScorer};

/// Collection-level statistics a term scorer may use.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    /// Total number of documents in the index.
    pub doc_count: u64,
    /// Number of documents that have the field.
    pub field_doc_count: u64,
    /// Average field length in tokens.
    pub avg_field_length: f64,
}

/// Everything known about one term occurrence when it is scored.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub collection: &'a CollectionStats,
    pub term: &'a TermStats,
    /// Occurrences of the term in the document.
    pub term_freq: u64,
    /// Tokens in the document's field, when norms are available.
    pub field_length: Option<u64>,
    pub boost: f64,
}

/// Trait for per-term similarity scorers.
pub trait Scorer: Send + Sync + Debug {
    /// Calculate the score of a term occurrence.
    fn score(&self, input: &ScoreInput<'_>) -> f64;

    /// Explain the score of a term occurrence.
    fn explain(&self, input: &ScoreInput<'_>) -> Explanation {
        Explanation::new(
            self.score(input),
            format!("{}(term={})", self.name(), input.term.term_lossy()),
        )
    }

    /// Get the name of this scorer.
    fn name(&self) -> &'static str;
}

/// Gives every matching document the query boost.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantScorer;

impl Scorer for ConstantScorer {
    fn score(&self, input: &ScoreInput<'_>) -> f64 {
        input.boost
    }

    fn name(&self) -> &'static str {
        "ConstantScore"
    }
}
