//! Error types for the protocol crate.

use thiserror::Error;

/// Result type for protocol-type operations.
pub type TypesResult<T> = Result<T, TypesError>;

/// Errors that can occur while encoding or decoding protocol types.
#[derive(Debug, Error)]
pub enum TypesError {
    /// Entry payload could not be decoded.
    #[error("payload decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// Entry payload could not be encoded.
    #[error("payload encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// A stage-type string was not recognized.
    #[error("unknown stage type: {0:?}")]
    UnknownStageType(String),
}
