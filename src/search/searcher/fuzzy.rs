//! Fuzzy expansion: dictionary terms within a bounded edit distance.
//!
//! A term matches when its first `prefix_length` bytes equal those of the
//! query term and the rest of it is at most `fuzziness` edits away from the
//! rest of the query term. Only the literal prefix's slice of the dictionary
//! is scanned.

use std::sync::Arc;

use crate::error::{Result, SearchError};
use crate::lexical::core::automaton::{AutomatonTermsEnum, LevenshteinAutomaton};
use crate::lexical::core::terms::DictionaryScope;
use crate::lexical::reader::IndexReader;
use crate::search::clause_guard::ClauseGuard;
use crate::search::scoring::{CompositeScorer, Scorer};
use crate::search::searcher::multi_term::new_multi_term_searcher;
use crate::search::searcher::prefix::CandidateTerm;
use crate::search::searcher::{Searcher, SearcherOptions};
use crate::util::bytes::prefix_successor;

/// Largest edit distance a fuzzy search accepts.
pub const MAX_FUZZINESS: u32 = 2;

/// Weight lost per edit.
const EDIT_PENALTY: f64 = 0.2;

/// Weight of a term `edit_distance` edits away from the query term.
pub fn fuzzy_weight(edit_distance: u32) -> f64 {
    (1.0 - EDIT_PENALTY * edit_distance as f64).max(0.0)
}

/// Check a requested edit distance against `maximum`.
fn validate_fuzziness(fuzziness: i32, maximum: u32) -> Result<u32> {
    if fuzziness < 0 {
        return Err(SearchError::InvalidFuzziness(fuzziness));
    }
    let fuzziness = fuzziness as u32;
    if fuzziness > maximum {
        return Err(SearchError::FuzzinessExceedsMaximum {
            requested: fuzziness as i32,
            maximum,
        });
    }
    Ok(fuzziness)
}

/// Collect the terms of `field` within `fuzziness` edits of `term`, sharing
/// its first `prefix_length` bytes, in dictionary order.
pub fn enumerate_fuzzy_terms(
    reader: &dyn IndexReader,
    field: &str,
    term: &[u8],
    prefix_length: usize,
    fuzziness: u32,
    guard: &ClauseGuard,
) -> Result<Vec<CandidateTerm>> {
    if fuzziness > MAX_FUZZINESS {
        return Err(SearchError::FuzzinessExceedsMaximum {
            requested: fuzziness.min(i32::MAX as u32) as i32,
            maximum: MAX_FUZZINESS,
        });
    }
    let automaton = LevenshteinAutomaton::new(term, fuzziness, prefix_length)?;
    enumerate_with(reader, field, &automaton, guard)
}

fn enumerate_with(
    reader: &dyn IndexReader,
    field: &str,
    automaton: &LevenshteinAutomaton,
    guard: &ClauseGuard,
) -> Result<Vec<CandidateTerm>> {
    let prefix = automaton.prefix();
    let upper = prefix_successor(prefix);
    tracing::debug!(
        field,
        term = %String::from_utf8_lossy(automaton.pattern()),
        prefix_length = automaton.prefix_length(),
        fuzziness = automaton.max_edits(),
        "enumerating fuzzy terms"
    );

    let mut scope = DictionaryScope::new(reader.dictionary_iterator(
        field,
        prefix,
        upper.as_deref(),
    )?);

    let mut candidates = Vec::new();
    let visited = {
        let mut terms = AutomatonTermsEnum::new(&mut scope, automaton);
        while let Some((stats, distance)) = terms.next()? {
            candidates.push(CandidateTerm::new(stats, distance));
            guard.check(field, candidates.len())?;
        }
        terms.visited()
    };
    scope.close()?;

    tracing::debug!(
        field,
        visited,
        candidates = candidates.len(),
        "fuzzy expansion finished"
    );
    Ok(candidates)
}

/// Search `field` for every term within `fuzziness` edits of `term`.
///
/// `fuzziness` is validated before the reader is touched: a negative value is
/// rejected with [`SearchError::InvalidFuzziness`], one above
/// `options.max_fuzziness` (never more than [`MAX_FUZZINESS`]) with
/// [`SearchError::FuzzinessExceedsMaximum`]. Each expanded term is weighted
/// with [`fuzzy_weight`] of its edit distance.
#[allow(clippy::too_many_arguments)]
pub fn new_fuzzy_searcher(
    reader: &dyn IndexReader,
    term: &[u8],
    prefix_length: usize,
    fuzziness: i32,
    field: &str,
    boost: f64,
    scorer: Option<Arc<dyn Scorer>>,
    composite: Arc<dyn CompositeScorer>,
    options: &SearcherOptions,
) -> Result<Box<dyn Searcher>> {
    let fuzziness = validate_fuzziness(fuzziness, options.max_fuzziness.min(MAX_FUZZINESS))?;
    let automaton = LevenshteinAutomaton::new(term, fuzziness, prefix_length)?;

    let candidates = enumerate_with(reader, field, &automaton, &options.clause_guard())?;

    let terms: Vec<&[u8]> = candidates.iter().map(|c| c.term.as_slice()).collect();
    let weights: Vec<f64> = candidates
        .iter()
        .map(|c| fuzzy_weight(c.edit_distance))
        .collect();

    new_multi_term_searcher(
        reader, &terms, &weights, field, boost, scorer, composite, options, true,
    )
}
