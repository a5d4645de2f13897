//! Composite scoring of multi-term matches.
//!
//! When a document matches several expanded terms, each matching term yields
//! a [`TermContribution`]. A [`CompositeScorer`] folds those into the final
//! document score and, on request, an explanation naming every contributing
//! term.

use std::fmt::Debug;

use crate::search::explanation::Explanation;

/// One expanded term's share of a document's score.
#[derive(Debug, Clone, PartialEq)]
pub struct TermContribution {
    /// Position of the term in the candidate term set.
    pub clause: usize,
    /// The term's own score for this document.
    pub score: f64,
    /// Per-term weight supplied by the term enumerator.
    pub weight: f64,
    /// The term scorer's explanation, when explanations are requested.
    pub explanation: Option<Explanation>,
}

/// Folds per-term contributions into one document score.
///
/// Implementations must be deterministic in the contributions they are given:
/// the same contributions in the same order always yield the same score.
pub trait CompositeScorer: Send + Sync + Debug {
    /// Combine the contributions into a score.
    fn score_composite(&self, contributions: &[TermContribution]) -> f64;

    /// Combine the contributions into a score and explain it.
    fn explain_composite(&self, contributions: &[TermContribution]) -> Explanation;
}

fn contribution_explanations(contributions: &[TermContribution]) -> Vec<Explanation> {
    contributions
        .iter()
        .map(|c| match &c.explanation {
            Some(explanation) => explanation.clone(),
            None => Explanation::new(c.score, format!("clause {}", c.clause)),
        })
        .collect()
}

/// Sums the contributions, ignoring weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeSumScorer;

impl CompositeSumScorer {
    pub fn new() -> Self {
        CompositeSumScorer
    }
}

impl CompositeScorer for CompositeSumScorer {
    fn score_composite(&self, contributions: &[TermContribution]) -> f64 {
        contributions.iter().map(|c| c.score).sum()
    }

    fn explain_composite(&self, contributions: &[TermContribution]) -> Explanation {
        Explanation::with_children(
            self.score_composite(contributions),
            "sum of:",
            contribution_explanations(contributions),
        )
    }
}

/// Sums each contribution multiplied by its term weight.
///
/// Meant for fuzzy expansion, whose weights taper with edit distance so that
/// closer terms count for more.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedSumScorer;

impl WeightedSumScorer {
    pub fn new() -> Self {
        WeightedSumScorer
    }
}

impl CompositeScorer for WeightedSumScorer {
    fn score_composite(&self, contributions: &[TermContribution]) -> f64 {
        contributions.iter().map(|c| c.score * c.weight).sum()
    }

    fn explain_composite(&self, contributions: &[TermContribution]) -> Explanation {
        let children = contributions
            .iter()
            .zip(contribution_explanations(contributions))
            .map(|(c, explanation)| {
                Explanation::with_children(
                    c.score * c.weight,
                    "weighted, product of:",
                    vec![explanation, Explanation::new(c.weight, "term weight")],
                )
            })
            .collect();
        Explanation::with_children(
            self.score_composite(contributions),
            "weighted sum of:",
            children,
        )
    }
}
