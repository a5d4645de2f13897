//! # Sarissa multi-term
//!
//! Term expansion and multi-term searchers for a full-text search library.
//!
//! ## Features
//!
//! - Prefix expansion over a sorted term dictionary
//! - Fuzzy expansion with a bounded Levenshtein distance and a literal prefix
//! - A clause ceiling that refuses runaway expansions
//! - Disjunction and conjunction searchers merging posting lists in document order
//! - Pluggable per-term and composite scoring (BM25 by default)
//! - An in-memory index for tests and small corpora
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sarissa_multiterm::prelude::*;
//!
//! let index = MemoryIndex::builder()
//!     .add_text(0, "desc", "beet water")
//!     .add_text(1, "desc", "beets")
//!     .add_text(2, "desc", "waterfall")
//!     .build();
//!
//! let mut searcher = new_fuzzy_searcher(
//!     &index,
//!     b"beet",
//!     1,
//!     1,
//!     "desc",
//!     1.0,
//!     None,
//!     Arc::new(WeightedSumScorer::new()),
//!     &SearcherOptions::default(),
//! )?;
//!
//! let mut ctx = SearchContext::for_searcher(&*searcher);
//! let mut docs = Vec::new();
//! while let Some(dm) = searcher.next(&mut ctx)? {
//!     docs.push(dm.number);
//!     ctx.document_match_pool.put(dm);
//! }
//! searcher.close()?;
//! assert_eq!(docs, vec![0, 1]);
//! # Ok::<(), sarissa_multiterm::error::SearchError>(())
//! ```

pub mod error;
pub mod lexical;
pub mod search;
pub mod util;

pub mod prelude {
    pub use crate::error::{Result, SearchError};
    pub use crate::lexical::core::terms::{DictionaryIterator, TermStats};
    pub use crate::lexical::index::memory::MemoryIndex;
    pub use crate::lexical::reader::{IndexReader, PostingIterator};
    pub use crate::search::{
        BM25Scorer, CompositeScorer, CompositeSumScorer, ConstantScorer, DocumentMatch,
        SearchConfig, SearchContext, Searcher, SearcherOptions, WeightedSumScorer,
        new_fuzzy_searcher, new_multi_term_searcher, new_term_prefix_searcher,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
