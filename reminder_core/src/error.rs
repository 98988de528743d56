//! Typed outcomes for lookups that can fail in the normal course of use.

use thiserror::Error;

/// A unit query that produced nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderError {
    #[error("unit '{query}' not found")]
    NotFound { query: String },

    #[error("unit '{query}' is ambiguous: {}", candidates.join(", "))]
    Ambiguous {
        query: String,
        candidates: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("unknown format: {0}. Use text, paged or json")]
    UnknownFormat(String),

    #[error("failed to serialize report: {0}")]
    Serialize(String),
}
