//! Domain errors.
//!
//! Invariant violations and allocation exhaustion are programming errors
//! and panic; this module covers the one condition a caller can recover
//! from.

use thiserror::Error;

/// Errors raised by count queries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The query expression must denote exactly one tree; a sum, an
    /// unresolved alternative, or `bot` has no single coefficient to read.
    #[error("count query must denote exactly one tree, but denotes {sets} trees")]
    NonSingletonQuery {
        /// Number of trees the query compiled to.
        sets: u64,
    },
}
