//! Per-provider entry payload codecs.

use syncinfo_types::{DataChangeInfo, EntryPayload, MetaSnapshotInfo, TypesResult};

/// The payload codec a provider applies to raw collaborator records.
///
/// Providers form a closed set, and so do their payload types; the codec is
/// selected at construction and applied to every record before it becomes an
/// [`syncinfo_types::Entry`]. A record that fails its codec is skipped, not
/// fatal to the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryCodec {
    /// Mutation events: [`DataChangeInfo`] payloads.
    DataChange,
    /// Full-enumeration snapshots: [`MetaSnapshotInfo`] payloads.
    MetaSnapshot,
}

impl EntryCodec {
    /// Validates that `data` decodes as this codec's payload type.
    pub fn check(&self, data: &[u8]) -> TypesResult<()> {
        match self {
            EntryCodec::DataChange => DataChangeInfo::decode(data).map(|_| ()),
            EntryCodec::MetaSnapshot => MetaSnapshotInfo::decode(data).map(|_| ()),
        }
    }
}
