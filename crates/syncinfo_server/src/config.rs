//! Wire adapter configuration.

/// Configuration for the sync-info service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Fetch budget applied when the request carries no `max` parameter.
    pub default_max_entries: usize,
    /// Cap on marker-update request bodies, in bytes.
    pub max_marker_body: usize,
}

impl ServiceConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            default_max_entries: 1000,
            max_marker_body: 128 * 1024,
        }
    }

    /// Sets the default fetch budget.
    pub fn with_default_max_entries(mut self, max: usize) -> Self {
        self.default_max_entries = max;
        self
    }

    /// Sets the marker-body cap.
    pub fn with_max_marker_body(mut self, limit: usize) -> Self {
        self.max_marker_body = limit;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}
