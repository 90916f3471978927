//! Fetch result types.

use crate::marker::Marker;
use serde::{Deserialize, Serialize};

/// A single change event returned by a fetch.
///
/// `key` is the resumption token for this specific entry: passing it back as
/// the next fetch marker yields entries strictly after it. Keys are
/// monotonically increasing within a shard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Resumption token for this entry.
    pub key: Marker,
    /// JSON-encoded typed payload.
    pub data: Vec<u8>,
}

impl Entry {
    /// Creates an entry from a key and an encoded payload.
    pub fn new(key: Marker, data: Vec<u8>) -> Self {
        Self { key, data }
    }
}

/// Result of one fetch call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    /// Entries in source order.
    pub entries: Vec<Entry>,
    /// True if the underlying source had more data than the requested budget.
    pub more: bool,
    /// True if the entire shard has been enumerated and will never produce
    /// new entries. Only full-type stages ever complete.
    pub done: bool,
}

impl FetchResult {
    /// Marker to resume from: the key of the last entry returned.
    pub fn next_marker(&self) -> Option<&Marker> {
        self.entries.last().map(|e| &e.key)
    }
}
