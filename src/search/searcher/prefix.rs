//! Prefix expansion: every dictionary term that starts with a byte prefix.

use std::sync::Arc;

use crate::error::Result;
use crate::lexical::core::terms::{DictionaryScope, TermStats};
use crate::lexical::reader::IndexReader;
use crate::search::clause_guard::ClauseGuard;
use crate::search::scoring::{CompositeScorer, Scorer};
use crate::search::searcher::multi_term::new_multi_term_searcher;
use crate::search::searcher::{Searcher, SearcherOptions};
use crate::util::bytes::prefix_successor;

/// A dictionary term accepted by an expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTerm {
    /// The term bytes.
    pub term: Vec<u8>,
    /// Dictionary statistics of the term.
    pub stats: TermStats,
    /// Edit distance from the query term; 0 for prefix matches.
    pub edit_distance: u32,
}

impl CandidateTerm {
    pub(crate) fn new(stats: TermStats, edit_distance: u32) -> Self {
        CandidateTerm {
            term: stats.term.clone(),
            stats,
            edit_distance,
        }
    }
}

/// Collect the terms of `field` that start with `prefix`, in dictionary order.
///
/// The scan covers `[prefix, successor(prefix))`, unbounded above when the
/// prefix has no successor. `guard` is checked after every accepted term.
pub fn enumerate_prefix_terms(
    reader: &dyn IndexReader,
    field: &str,
    prefix: &[u8],
    guard: &ClauseGuard,
) -> Result<Vec<CandidateTerm>> {
    let upper = prefix_successor(prefix);
    tracing::debug!(
        field,
        prefix = %String::from_utf8_lossy(prefix),
        bounded = upper.is_some(),
        "enumerating prefix terms"
    );

    let mut scope = DictionaryScope::new(reader.dictionary_iterator(
        field,
        prefix,
        upper.as_deref(),
    )?);

    let mut candidates = Vec::new();
    while let Some(stats) = scope.next()? {
        candidates.push(CandidateTerm::new(stats, 0));
        guard.check(field, candidates.len())?;
    }
    scope.close()?;

    tracing::debug!(field, candidates = candidates.len(), "prefix expansion finished");
    Ok(candidates)
}

/// Search `field` for every term starting with `prefix`.
///
/// Each expanded term is weighted with its document frequency.
pub fn new_term_prefix_searcher(
    reader: &dyn IndexReader,
    prefix: &[u8],
    field: &str,
    boost: f64,
    scorer: Option<Arc<dyn Scorer>>,
    composite: Arc<dyn CompositeScorer>,
    options: &SearcherOptions,
) -> Result<Box<dyn Searcher>> {
    let candidates = enumerate_prefix_terms(reader, field, prefix, &options.clause_guard())?;

    let terms: Vec<&[u8]> = candidates.iter().map(|c| c.term.as_slice()).collect();
    let weights: Vec<f64> = candidates
        .iter()
        .map(|c| c.stats.doc_freq as f64)
        .collect();

    new_multi_term_searcher(
        reader, &terms, &weights, field, boost, scorer, composite, options, true,
    )
}
