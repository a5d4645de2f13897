//! Multi-term search: term expansion and the searchers that merge the
//! expanded terms' posting lists.

pub mod clause_guard;
pub mod context;
pub mod document_match;
pub mod explanation;
pub mod scoring;
pub mod searcher;

pub use self::clause_guard::{ClauseGuard, max_clause_count, set_max_clause_count};
pub use self::context::SearchContext;
pub use self::document_match::{DocumentMatch, DocumentMatchPool};
pub use self::explanation::Explanation;
pub use self::scoring::*;
pub use self::searcher::*;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::search::clause_guard::DEFAULT_MAX_CLAUSE_COUNT;

/// Configuration for search operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Most terms one expansion may produce. `0` disables the limit.
    pub max_clause_count: usize,
    /// Largest edit distance fuzzy searches accept.
    pub max_fuzziness: u32,
    /// Attach score explanations to matches.
    pub explain: bool,
    /// Whether to compute scores.
    pub score: ScoreMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_clause_count: DEFAULT_MAX_CLAUSE_COUNT,
            max_fuzziness: MAX_FUZZINESS,
            explain: false,
            score: ScoreMode::Scored,
        }
    }
}

impl SearchConfig {
    /// Parse a configuration from JSON, filling absent keys with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_fuzziness > MAX_FUZZINESS {
            return Err(SearchError::config(format!(
                "max_fuzziness {} exceeds the supported maximum {MAX_FUZZINESS}",
                self.max_fuzziness
            )));
        }
        Ok(())
    }

    /// Set the maximum clause count.
    pub fn max_clause_count(mut self, max_clause_count: usize) -> Self {
        self.max_clause_count = max_clause_count;
        self
    }

    /// Set the maximum fuzziness.
    pub fn max_fuzziness(mut self, max_fuzziness: u32) -> Self {
        self.max_fuzziness = max_fuzziness;
        self
    }

    /// Set whether matches carry explanations.
    pub fn explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    /// Install `max_clause_count` as the process-wide clause ceiling.
    pub fn apply_global(&self) -> Result<()> {
        self.validate()?;
        set_max_clause_count(self.max_clause_count);
        Ok(())
    }

    /// Options for searchers built under this configuration.
    ///
    /// The clause ceiling is pinned to this configuration rather than read
    /// from the process-wide value.
    pub fn searcher_options(&self) -> SearcherOptions {
        SearcherOptions {
            explain: self.explain,
            score: self.score,
            max_clause_count: Some(self.max_clause_count),
            max_fuzziness: self.max_fuzziness.min(MAX_FUZZINESS),
        }
    }
}
