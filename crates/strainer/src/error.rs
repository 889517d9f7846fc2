//! Error types for the strainer crate.

use thiserror::Error;

/// Errors that can occur when parsing filter keys, composing queries, or
/// executing them through an adapter.
#[derive(Debug, Error)]
pub enum FinderError {
    /// Predicate token is not registered.
    #[error("unknown predicate '{token}'")]
    UnknownPredicate { token: String },

    /// Filter key does not end in any registered predicate token.
    #[error("invalid filter key '{key}': no predicate suffix")]
    InvalidFilterKey { key: String },

    /// Filter key names a field that was not declared filterable.
    #[error("unknown field '{field}' in filter key '{key}'")]
    UnknownField { field: String, key: String },

    /// Field value and operand cannot be compared by the predicate.
    #[error("type mismatch on '{field}' ({predicate}): expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        predicate: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Parameter document could not be turned into filter parameters.
    #[error("invalid filter parameters: {0}")]
    InvalidParams(String),

    /// Failure surfaced by the adapter while executing a query.
    #[error("query execution failed: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FinderError {
    /// Wraps an adapter failure.
    pub fn execution<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        FinderError::Execution(err.into())
    }
}

/// Result type for strainer operations.
pub type Result<T> = std::result::Result<T, FinderError>;
