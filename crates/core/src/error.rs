//! Storage error model shared by repository traits.

use thiserror::Error;

/// Result type returned by every repository operation.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a persistence adapter.
///
/// Domain crates translate these into their own error enums; only the
/// `Conflict` case carries meaning beyond "the store is unhealthy".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store failed (connection, query, decode, poisoned lock).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// An identifier failed to parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid identifier: {0}")]
pub struct InvalidId(pub String);
