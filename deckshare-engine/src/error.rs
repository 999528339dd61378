//! Error types for the engine.

use deckshare_store::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors an engine operation can surface to its caller.
///
/// The engine performs no automatic retry; retry policy, if any, belongs to
/// the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No authenticated actor was supplied.
    #[error("no authenticated actor")]
    Unauthenticated,

    /// The addressed deck or card does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The deck carries fork provenance and may not be published.
    #[error("a forked deck cannot be shared to the gallery")]
    ForkNotShareable,

    /// The underlying store failed a read, write or subscribe.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// A stored document did not decode into the expected shape.
    #[error("malformed document: {0}")]
    Decode(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn deck_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("deck {id}"))
    }

    pub(crate) fn card_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("card {id}"))
    }
}
