//! Cursor primitives: markers and timestamps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque, resumable cursor into an ordered stream.
///
/// Markers are totally ordered by the underlying source. Two markers from
/// the same shard compare in stream order; markers from different shards are
/// not comparable in any meaningful way.
///
/// The empty marker denotes the beginning of retained history.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker(String);

impl Marker {
    /// Creates a marker from a cursor token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The zero marker: beginning of retained history.
    pub fn zero() -> Self {
        Self(String::new())
    }

    /// Returns true if this is the zero marker.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw cursor token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Marker {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for Marker {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// A best-effort wall-clock hint, in milliseconds since the Unix epoch.
///
/// Timestamps are informational only; ordering is defined by markers, never
/// by timestamps. Zero means unknown.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The zero (unknown) timestamp.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Returns true if the timestamp is unknown.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Milliseconds since the Unix epoch.
    pub fn millis(&self) -> u64 {
        self.0
    }
}

/// A marker paired with its timestamp hint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPosition {
    /// Cursor position.
    pub marker: Marker,
    /// Wall-clock hint for the position.
    pub timestamp: Timestamp,
}

impl MarkerPosition {
    /// Creates a position from a marker and timestamp.
    pub fn new(marker: Marker, timestamp: Timestamp) -> Self {
        Self { marker, timestamp }
    }

    /// The zero position: beginning of retained history, unknown time.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// The latest known position of a stage shard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardState {
    /// Latest known marker.
    pub marker: Marker,
    /// Wall-clock hint for the latest position.
    pub timestamp: Timestamp,
    /// True if the shard is not currently accepting or producing data.
    ///
    /// Informational, not an error.
    pub disabled: bool,
}
