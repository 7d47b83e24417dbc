//! Error types for the todo service.
//!
//! # Design
//! `TodoError` separates the two outcomes a caller is expected to handle
//! (`BadRequest`, `NotFound`) from store failures, which are wrapped as-is
//! and left for the outer layer to report.

use thiserror::Error;

/// Failures raised by an `ItemStore`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A staged update or removal targets an id that is not stored.
    #[error("item {0} is not tracked by the store")]
    NotTracked(i64),

    /// Any other failure of the underlying storage.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Errors returned by `TodoService` operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// The item was absent or its id did not match the requested id.
    #[error("bad request")]
    BadRequest,

    /// No stored item has the given id.
    #[error("todo item {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}
