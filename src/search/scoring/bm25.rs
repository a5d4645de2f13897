//! BM25 term scoring.

use serde::{Deserialize, Serialize};

use crate::search::explanation::Explanation;
use crate::search::scoring::{ScoreInput, Scorer};

/// BM25 scorer implementation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BM25Scorer {
    /// Term frequency saturation.
    k1: f64,
    /// Field length normalization.
    b: f64,
}

impl Default for BM25Scorer {
    fn default() -> Self {
        BM25Scorer { k1: 1.2, b: 0.75 }
    }
}

impl BM25Scorer {
    /// Create a new BM25 scorer with custom parameters.
    pub fn with_params(k1: f64, b: f64) -> Self {
        BM25Scorer { k1, b }
    }

    /// Get the k1 parameter.
    pub fn k1(&self) -> f64 {
        self.k1
    }

    /// Get the b parameter.
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Calculate the IDF (Inverse Document Frequency) component.
    ///
    /// `ln(1 + (N - df + 0.5) / (df + 0.5))`, which stays positive even for
    /// terms present in most documents.
    fn idf(&self, doc_freq: u64, doc_count: u64) -> f64 {
        if doc_freq == 0 || doc_count == 0 {
            return 0.0;
        }

        let n = doc_count as f64;
        let df = doc_freq.min(doc_count) as f64;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Calculate the TF (Term Frequency) component.
    fn tf(&self, term_freq: u64, field_length: Option<u64>, avg_field_length: f64) -> f64 {
        if term_freq == 0 {
            return 0.0;
        }

        let norm_factor = match field_length {
            Some(len) if avg_field_length > 0.0 => {
                1.0 - self.b + self.b * (len as f64 / avg_field_length)
            }
            _ => 1.0,
        };

        let tf = term_freq as f64;
        (tf * (self.k1 + 1.0)) / (tf + self.k1 * norm_factor)
    }
}

impl Scorer for BM25Scorer {
    fn score(&self, input: &ScoreInput<'_>) -> f64 {
        let idf = self.idf(input.term.doc_freq, input.collection.doc_count);
        let tf = self.tf(
            input.term_freq,
            input.field_length,
            input.collection.avg_field_length,
        );
        input.boost * idf * tf
    }

    fn explain(&self, input: &ScoreInput<'_>) -> Explanation {
        let idf = self.idf(input.term.doc_freq, input.collection.doc_count);
        let tf = self.tf(
            input.term_freq,
            input.field_length,
            input.collection.avg_field_length,
        );
        Explanation::with_children(
            input.boost * idf * tf,
            format!("score(term={}), product of:", input.term.term_lossy()),
            vec![
                Explanation::new(input.boost, "boost"),
                Explanation::new(
                    idf,
                    format!(
                        "idf, computed as ln(1 + (N - n + 0.5) / (n + 0.5)) from: n={}, N={}",
                        input.term.doc_freq, input.collection.doc_count
                    ),
                ),
                Explanation::new(
                    tf,
                    format!(
                        "tf, computed as freq * (k1 + 1) / (freq + k1 * (1 - b + b * dl / avgdl)) from: freq={}, k1={}, b={}, dl={}, avgdl={}",
                        input.term_freq,
                        self.k1,
                        self.b,
                        input
                            .field_length
                            .map_or_else(|| "n/a".to_string(), |len| len.to_string()),
                        input.collection.avg_field_length
                    ),
                ),
            ],
        )
    }

    fn name(&self) -> &'static str {
        "BM25"
    }
}
