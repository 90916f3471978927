//! Typed entry payloads and their JSON codec.
//!
//! Entry payloads travel inside [`crate::Entry::data`] as JSON bytes so the
//! wire adapter can round-trip them without knowing the concrete type.

use crate::error::{TypesError, TypesResult};
use crate::marker::Timestamp;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A typed entry payload with a stable JSON encoding.
pub trait EntryPayload: Serialize + DeserializeOwned {
    /// Encodes the payload as JSON bytes.
    fn encode(&self) -> TypesResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(TypesError::Encode)
    }

    /// Decodes the payload from JSON bytes.
    fn decode(data: &[u8]) -> TypesResult<Self> {
        serde_json::from_slice(data).map_err(TypesError::Decode)
    }
}

/// Decodes an opaque payload into a JSON value for wire output.
pub(crate) fn decode_json_value(data: &[u8]) -> TypesResult<serde_json::Value> {
    serde_json::from_slice(data).map_err(TypesError::Decode)
}

/// Payload of a data-change entry: one mutated source key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataChangeInfo {
    /// Source key that changed.
    pub key: String,
    /// Shard of the source key within its own layout, if sharded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_id: Option<u32>,
    /// Shard count of the source key's own layout.
    #[serde(default)]
    pub num_shards: u32,
    /// When the change was observed. Zero if unknown.
    #[serde(default)]
    pub timestamp: Timestamp,
}

impl EntryPayload for DataChangeInfo {}

/// Payload of a full-enumeration entry: one object in its current state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaSnapshotInfo {
    /// Listing section the object belongs to.
    pub section: String,
    /// Object identifier within the section.
    pub id: String,
}

impl EntryPayload for MetaSnapshotInfo {}

impl crate::Entry {
    /// Decodes the entry payload as a JSON value, for wire output.
    pub fn info_value(&self) -> TypesResult<serde_json::Value> {
        decode_json_value(&self.data)
    }
}
