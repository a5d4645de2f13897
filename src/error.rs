//! Error types for the multi-term search core.
//!
//! All fallible operations return [`Result`], whose error is a [`SearchError`].
//! Errors are handed back to the caller; nothing in this crate logs and
//! swallows a failure.
//!
//! # Examples
//!
//! ```
//! use sarissa_multiterm::error::{Result, SearchError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SearchError::invalid_parameter("prefix length exceeds term length"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for searcher construction and iteration.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A constructor argument is malformed.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A negative edit distance was requested.
    #[error("Invalid fuzziness: {0} (must not be negative)")]
    InvalidFuzziness(i32),

    /// The requested edit distance is above the supported ceiling.
    #[error("Fuzziness {requested} exceeds maximum ({maximum})")]
    FuzzinessExceedsMaximum { requested: i32, maximum: u32 },

    /// Term expansion produced more clauses than allowed.
    #[error("TooManyClauses over field: `{field}` [{count} > maxClauseCount, which is set to {max}]")]
    TooManyClauses {
        field: String,
        count: usize,
        max: usize,
    },

    /// Reading the term dictionary or a posting list failed.
    #[error("Iterator error: {0}")]
    Iterator(String),

    /// Releasing a resource failed.
    #[error("Close error: {0}")]
    Close(String),

    /// I/O errors raised by a storage collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Opaque errors reported by external collaborators.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// Create a new invalid parameter error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        SearchError::InvalidParameter(msg.into())
    }

    /// Create a new iterator error.
    pub fn iterator<S: Into<String>>(msg: S) -> Self {
        SearchError::Iterator(msg.into())
    }

    /// Create a new close error.
    pub fn close<S: Into<String>>(msg: S) -> Self {
        SearchError::Close(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SearchError::Config(msg.into())
    }

    /// Whether the query itself was refused, as opposed to failing while reading.
    ///
    /// A refused query is a query-level failure and must never be reported as
    /// an empty result set.
    pub fn is_query_rejection(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidParameter(_)
                | SearchError::InvalidFuzziness(_)
                | SearchError::FuzzinessExceedsMaximum { .. }
                | SearchError::TooManyClauses { .. }
        )
    }
}
