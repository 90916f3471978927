//! Error types for the wire adapter.

use syncinfo_core::SipError;
use thiserror::Error;

/// Result type for wire operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors a request can fail with at the wire boundary.
#[derive(Debug, Error)]
pub enum WireError {
    /// A required query parameter was absent.
    #[error("missing required parameter: {name}")]
    MissingParam {
        /// Name of the parameter.
        name: &'static str,
    },

    /// A query parameter did not parse.
    #[error("invalid parameter {name}: {message}")]
    InvalidParam {
        /// Name of the parameter.
        name: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// Request body exceeded the configured cap.
    #[error("request body too large: limit is {limit} bytes")]
    BodyTooLarge {
        /// The configured cap in bytes.
        limit: usize,
    },

    /// Request body was not valid JSON for the expected shape.
    #[error("malformed request body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    /// No operation matches the verb and parameters.
    #[error("no operation matches the request")]
    UnknownOperation,

    /// A core provider, tracker, or registry error.
    #[error(transparent)]
    Sip(#[from] SipError),
}

impl WireError {
    /// Stable external status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            WireError::MissingParam { .. }
            | WireError::InvalidParam { .. }
            | WireError::BodyTooLarge { .. }
            | WireError::MalformedBody(_) => 400,
            WireError::UnknownOperation => 405,
            WireError::Sip(err) => match err {
                SipError::NotFound { .. } => 404,
                SipError::Range { .. } | SipError::InvalidArgument { .. } => 400,
                SipError::Cancelled => 408,
                SipError::Unsupported { .. } => 405,
                SipError::Io { .. } | SipError::Types(_) => 500,
            },
        }
    }

    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(WireError::MissingParam { name: "stage-id" }.status(), 400);
        assert_eq!(WireError::UnknownOperation.status(), 405);
        assert_eq!(
            WireError::from(SipError::not_found("provider x")).status(),
            404
        );
        assert_eq!(
            WireError::from(SipError::Range {
                shard: 9,
                num_shards: 4
            })
            .status(),
            400
        );
        assert_eq!(WireError::from(SipError::Cancelled).status(), 408);
        assert_eq!(
            WireError::from(SipError::unsupported("trim")).status(),
            405
        );
        assert_eq!(WireError::from(SipError::io("down")).status(), 500);
    }

    #[test]
    fn client_error_classification() {
        assert!(WireError::MissingParam { name: "marker" }.is_client_error());
        assert!(!WireError::from(SipError::io("down")).is_client_error());
    }
}
