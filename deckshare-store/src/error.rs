//! Error types for the store seam.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a document store backend can surface.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not serve the request (network, permissions,
    /// injected test failure).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The path addresses through a non-object value and cannot be resolved.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}
