//! Error types for meshstat sinks.

use thiserror::Error;

/// Result type alias for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Errors surfaced by a sink. Unrecognized metric kinds are skipped, never
/// reported here.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("label keys/values length mismatch: {keys} keys, {values} values")]
    LabelArityMismatch { keys: usize, values: usize },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write snapshot: {0}")]
    Write(#[from] std::io::Error),
}
