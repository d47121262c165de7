use thiserror::Error as ThisError;

/// Errors surfaced by the question bank client.
///
/// Validation errors are resolved locally and never reach the network layer;
/// transport and not-found errors come back from gateway calls and leave
/// prior local state intact.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// Empty/missing required field or malformed input file. The message
    /// names the offending field or item index.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Network failure, timeout or non-2xx response. Carries the
    /// backend-provided message when present.
    #[error("transport error: {0}")]
    Transport(String),

    /// Referenced entity is gone on the backend.
    #[error("not found: {0}")]
    NotFound(String),

    /// A mastery update for this item is still outstanding; callers must
    /// wait for it to settle before advancing again.
    #[error("update already in flight for item {0}")]
    UpdateInFlight(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
