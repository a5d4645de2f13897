//! Limit on the number of clauses a term expansion may produce.
//!
//! A one-character prefix or a loose fuzzy term can expand to millions of
//! dictionary terms. The enumerators check the running count after every
//! accepted term and refuse the query as soon as it passes the ceiling.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::SearchError;

/// Default process-wide clause ceiling.
pub const DEFAULT_MAX_CLAUSE_COUNT: usize = 1024;

static MAX_CLAUSE_COUNT: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_CLAUSE_COUNT);

/// The process-wide clause ceiling. `0` means unlimited.
pub fn max_clause_count() -> usize {
    MAX_CLAUSE_COUNT.load(Ordering::Relaxed)
}

/// Replace the process-wide clause ceiling. `0` disables the check.
pub fn set_max_clause_count(max: usize) {
    tracing::debug!(max, "setting max clause count");
    MAX_CLAUSE_COUNT.store(max, Ordering::Relaxed);
}

/// Whether `count` clauses exceed the process-wide ceiling.
pub fn too_many_clauses(count: usize) -> bool {
    exceeds(count, max_clause_count())
}

/// Build the error reported when `field` expanded to `count` clauses.
pub fn too_many_clauses_error(field: &str, count: usize) -> SearchError {
    SearchError::TooManyClauses {
        field: field.to_string(),
        count,
        max: max_clause_count(),
    }
}

fn exceeds(count: usize, max: usize) -> bool {
    max > 0 && count > max
}

/// A clause ceiling captured once for a whole expansion.
///
/// Enumerators check against one guard from start to finish, so a concurrent
/// change of the global ceiling cannot apply halfway through a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseGuard {
    max: usize,
}

impl ClauseGuard {
    /// A guard with an explicit ceiling. `0` means unlimited.
    pub fn new(max: usize) -> Self {
        ClauseGuard { max }
    }

    /// A guard using the current process-wide ceiling.
    pub fn from_global() -> Self {
        Self::new(max_clause_count())
    }

    /// The ceiling this guard enforces.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Whether `count` clauses exceed this guard's ceiling.
    pub fn is_exceeded(&self, count: usize) -> bool {
        exceeds(count, self.max)
    }

    /// Fail with `TooManyClauses` when `count` exceeds the ceiling.
    pub fn check(&self, field: &str, count: usize) -> Result<(), SearchError> {
        if self.is_exceeded(count) {
            tracing::debug!(field, count, max = self.max, "term expansion rejected");
            return Err(SearchError::TooManyClauses {
                field: field.to_string(),
                count,
                max: self.max,
            });
        }
        Ok(())
    }
}
