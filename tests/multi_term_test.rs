use std::collections::BTreeMap;
use std::sync::Arc;

use sarissa_multiterm::lexical::index::memory::MemoryIndex;
use sarissa_multiterm::search::{
    BM25Scorer, CompositeScorer, CompositeSumScorer, ScoreMode, SearchConfig, SearchContext,
    Searcher, SearcherOptions, TermContribution, WeightedSumScorer, new_multi_term_searcher,
};
use sarissa_multiterm::search::explanation::Explanation;

fn corpus() -> MemoryIndex {
    MemoryIndex::builder()
        .add_text(0, "desc", "the quick brown fox")
        .add_text(1, "desc", "quick quick fox")
        .add_text(2, "desc", "lazy dog")
        .add_text(3, "desc", "brown dog")
        .add_text(4, "desc", "the fox and the dog")
        .add_text(7, "desc", "quick")
        .add_text(8, "title", "fox")
        .build()
}

fn run(searcher: &mut dyn Searcher) -> Vec<(u64, f64)> {
    let mut ctx = SearchContext::for_searcher(searcher);
    let mut out = Vec::new();
    while let Some(dm) = searcher.next(&mut ctx).unwrap() {
        out.push((dm.number, dm.score));
        ctx.document_match_pool.put(dm);
    }
    out
}

fn search(
    index: &MemoryIndex,
    terms: &[&str],
    composite: Arc<dyn CompositeScorer>,
    options: &SearcherOptions,
    is_disjunction: bool,
) -> Vec<(u64, f64)> {
    let weights = vec![1.0; terms.len()];
    let mut searcher = new_multi_term_searcher(
        index,
        terms,
        &weights,
        "desc",
        1.0,
        None,
        composite,
        options,
        is_disjunction,
    )
    .unwrap();
    let results = run(searcher.as_mut());
    searcher.close().unwrap();
    assert_eq!(index.open_iterators(), 0);
    results
}

#[test]
fn test_disjunction_is_union_of_postings() {
    let index = corpus();
    let terms = ["quick", "fox", "dog"];
    let results = search(
        &index,
        &terms,
        Arc::new(CompositeSumScorer::new()),
        &SearcherOptions::default(),
        true,
    );

    let mut expected: Vec<u64> = terms
        .iter()
        .flat_map(|t| index.doc_ids("desc", t.as_bytes()))
        .collect();
    expected.sort_unstable();
    expected.dedup();
    let docs: Vec<u64> = results.iter().map(|(d, _)| *d).collect();
    assert_eq!(docs, expected);
    assert!(docs.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_disjunction_score_is_sum_of_term_scores() {
    let index = corpus();
    let options = SearcherOptions::default();
    let composite: Arc<dyn CompositeScorer> = Arc::new(CompositeSumScorer::new());

    let mut per_doc: BTreeMap<u64, f64> = BTreeMap::new();
    for term in ["quick", "fox"] {
        for (doc, score) in search(&index, &[term], composite.clone(), &options, true) {
            *per_doc.entry(doc).or_default() += score;
        }
    }

    let merged = search(&index, &["quick", "fox"], composite, &options, true);
    assert_eq!(merged.len(), per_doc.len());
    for (doc, score) in merged {
        assert!((score - per_doc[&doc]).abs() < 1e-9, "doc {doc}");
    }
}

#[test]
fn test_scores_are_deterministic() {
    let index = corpus();
    let options = SearcherOptions::default();
    let first = search(
        &index,
        &["dog", "quick", "the"],
        Arc::new(WeightedSumScorer::new()),
        &options,
        true,
    );
    let second = search(
        &index,
        &["dog", "quick", "the"],
        Arc::new(WeightedSumScorer::new()),
        &options,
        true,
    );
    assert_eq!(first, second);
}

#[test]
fn test_conjunction() {
    let index = corpus();
    let results = search(
        &index,
        &["the", "fox"],
        Arc::new(CompositeSumScorer::new()),
        &SearcherOptions::default(),
        false,
    );
    let docs: Vec<u64> = results.iter().map(|(d, _)| *d).collect();
    assert_eq!(docs, vec![0, 4]);
}

#[test]
fn test_unscored_mode() {
    let index = corpus();
    let options = SearcherOptions {
        score: ScoreMode::None,
        ..SearcherOptions::default()
    };
    let results = search(
        &index,
        &["quick", "dog"],
        Arc::new(CompositeSumScorer::new()),
        &options,
        true,
    );
    assert_eq!(results.len(), 6);
    assert!(results.iter().all(|(_, score)| *score == 0.0));
}

/// Keeps only the best contribution.
#[derive(Debug)]
struct MaxScorer;

impl CompositeScorer for MaxScorer {
    fn score_composite(&self, contributions: &[TermContribution]) -> f64 {
        contributions.iter().map(|c| c.score).fold(0.0, f64::max)
    }

    fn explain_composite(&self, contributions: &[TermContribution]) -> Explanation {
        Explanation::new(self.score_composite(contributions), "max of clauses")
    }
}

#[test]
fn test_custom_composite_scorer() {
    let index = corpus();
    let options = SearcherOptions::default().with_explain(true);
    let mut searcher = new_multi_term_searcher(
        &index,
        &["quick", "fox"],
        &[1.0, 1.0],
        "desc",
        1.0,
        Some(Arc::new(BM25Scorer::default())),
        Arc::new(MaxScorer),
        &options,
        true,
    )
    .unwrap();
    let mut ctx = SearchContext::for_searcher(&*searcher);

    let dm = searcher.advance(&mut ctx, 1).unwrap().unwrap();
    assert_eq!(dm.number, 1);
    let explanation = dm.explanation.clone().unwrap();
    assert_eq!(explanation.message, "max of clauses");
    assert_eq!(explanation.value, dm.score);
    ctx.document_match_pool.put(dm);

    searcher.close().unwrap();
    assert_eq!(index.open_iterators(), 0);
}

#[test]
fn test_config_drives_searcher_options() {
    let index = corpus();
    let config = SearchConfig::from_json(r#"{"max_clause_count": 2, "explain": true}"#).unwrap();
    let options = config.searcher_options();

    let result = new_multi_term_searcher(
        &index,
        &["quick", "fox", "dog"],
        &[1.0; 3],
        "desc",
        1.0,
        None,
        Arc::new(CompositeSumScorer::new()),
        &options,
        true,
    );
    assert!(result.is_err());

    let mut searcher = new_multi_term_searcher(
        &index,
        &["quick", "fox"],
        &[1.0; 2],
        "desc",
        1.0,
        None,
        Arc::new(CompositeSumScorer::new()),
        &options,
        true,
    )
    .unwrap();
    let mut ctx = SearchContext::for_searcher(&*searcher);
    let dm = searcher.next(&mut ctx).unwrap().unwrap();
    let explanation = dm.explanation.as_ref().unwrap();
    assert_eq!(explanation.children.len(), 2);
    // Explanations serialize for callers that log or return them.
    let json = serde_json::to_value(explanation).unwrap();
    assert_eq!(json["message"], "sum of:");
    ctx.document_match_pool.put(dm);
    searcher.close().unwrap();
}
