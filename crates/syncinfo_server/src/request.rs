//! Parsed request model for the wire adapter.
//!
//! The adapter is transport-independent: whatever HTTP front end is in use
//! parses the verb, query string, and body into a [`SipRequest`] and hands
//! it to the service.

use crate::error::{WireError, WireResult};
use std::collections::HashMap;

/// Request verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read operations: list, info, status, marker info, fetch.
    Get,
    /// Marker updates.
    Put,
    /// Trim and marker removal.
    Delete,
}

/// A parsed request: verb, query parameters, optional body.
#[derive(Debug, Clone)]
pub struct SipRequest {
    /// Request verb.
    pub method: Method,
    params: HashMap<String, String>,
    /// Raw request body, if any.
    pub body: Vec<u8>,
}

impl SipRequest {
    /// Creates a request with no parameters and no body.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            params: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds a query parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Adds a valueless flag parameter (e.g. `&info`).
    pub fn with_flag(self, name: impl Into<String>) -> Self {
        self.with_param(name, "")
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns a parameter's value if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns true if the parameter is present, even without a value.
    pub fn has(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Returns a required parameter's value.
    pub fn require(&self, name: &'static str) -> WireResult<&str> {
        self.param(name).ok_or(WireError::MissingParam { name })
    }

    /// Parses an optional `u32` parameter, with a default when absent.
    pub fn u32_param(&self, name: &'static str, default: u32) -> WireResult<u32> {
        match self.param(name) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| WireError::InvalidParam {
                name,
                message: format!("{raw:?} is not a valid integer"),
            }),
        }
    }

    /// Parses an optional `usize` parameter, with a default when absent.
    pub fn usize_param(&self, name: &'static str, default: usize) -> WireResult<usize> {
        match self.param(name) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| WireError::InvalidParam {
                name,
                message: format!("{raw:?} is not a valid integer"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_and_flags() {
        let req = SipRequest::new(Method::Get)
            .with_param("provider", "data.inc")
            .with_flag("info");
        assert_eq!(req.param("provider"), Some("data.inc"));
        assert!(req.has("info"));
        assert!(!req.has("status"));
    }

    #[test]
    fn require_missing_param() {
        let req = SipRequest::new(Method::Get);
        assert!(matches!(
            req.require("stage-id"),
            Err(WireError::MissingParam { name: "stage-id" })
        ));
    }

    #[test]
    fn integer_params() {
        let req = SipRequest::new(Method::Get)
            .with_param("shard-id", "3")
            .with_param("max", "junk");
        assert_eq!(req.u32_param("shard-id", 0).unwrap(), 3);
        assert_eq!(req.u32_param("absent", 7).unwrap(), 7);
        assert!(matches!(
            req.usize_param("max", 100),
            Err(WireError::InvalidParam { name: "max", .. })
        ));
    }
}
