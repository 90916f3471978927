//! Error types for syncinfo core.

use syncinfo_types::TypesError;
use thiserror::Error;

/// Result type for core operations.
pub type SipResult<T> = Result<T, SipError>;

/// Errors that can occur in provider, tracker, and registry operations.
#[derive(Debug, Error)]
pub enum SipError {
    /// Unknown provider, stage, or target.
    #[error("not found: {what}")]
    NotFound {
        /// What was looked up.
        what: String,
    },

    /// Shard index out of bounds for the stage.
    #[error("shard {shard} out of range for stage with {num_shards} shards")]
    Range {
        /// The requested shard.
        shard: u32,
        /// The stage's shard count.
        num_shards: u32,
    },

    /// Missing or malformed required argument.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// Collaborator failure (listing service, log storage, marker store).
    #[error("I/O error: {message}")]
    Io {
        /// Description of the failure.
        message: String,
    },

    /// Cooperative cancellation observed mid-loop.
    #[error("operation cancelled")]
    Cancelled,

    /// Operation not meaningful for this provider variant.
    #[error("unsupported operation: {message}")]
    Unsupported {
        /// Description of why the operation is unsupported.
        message: String,
    },

    /// Protocol-type encode/decode failure.
    #[error(transparent)]
    Types(#[from] TypesError),
}

impl SipError {
    /// Creates a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Creates an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an unsupported-operation error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_error_display() {
        let err = SipError::Range {
            shard: 99,
            num_shards: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("99"));
        assert!(msg.contains("4"));
    }

    #[test]
    fn helper_constructors() {
        assert!(matches!(
            SipError::not_found("provider data.inc"),
            SipError::NotFound { .. }
        ));
        assert!(matches!(
            SipError::invalid_argument("empty target_id"),
            SipError::InvalidArgument { .. }
        ));
    }
}
