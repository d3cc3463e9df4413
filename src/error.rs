//! Error types for the store boundary and the proving/verifying surface.
//!
//! Mirrors the teacher's own split: [`StoreError`] wraps whatever the
//! underlying store implementation reports (I/O, RocksDB status codes,
//! corrupt on-disk encodings) behind `anyhow`, while [`ProveError`] is a
//! small closed set of domain errors the tree itself can raise. Verifiers
//! never return `Result`, since a proof either checks out or it doesn't.

use thiserror::Error;

/// Something went wrong talking to the backing [`crate::store::OrderedStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed node key: {0}")]
    MalformedKey(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Errors raised by tree operations above the store boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProveError {
    #[error("key not found")]
    NotFound,

    #[error("key already exists")]
    KeyExists,

    #[error("key not found for deletion")]
    KeyNotFound,

    #[error("value already matches the stored value")]
    ValueMatches,

    #[error("store error: {0}")]
    Store(String),
}

impl From<StoreError> for ProveError {
    fn from(e: StoreError) -> Self {
        ProveError::Store(e.to_string())
    }
}
