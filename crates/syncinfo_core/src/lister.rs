//! Paginated listing collaborator for full enumeration.

use crate::error::SipResult;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use syncinfo_types::Marker;

/// One key returned by a listing round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedKey {
    /// The listed object's key.
    pub key: String,
    /// Listing cursor for this key; resumes strictly after it.
    pub marker: Marker,
    /// Raw record payload, decoded by the provider's payload codec.
    pub data: Vec<u8>,
}

/// One page of listing results.
#[derive(Debug, Clone, Default)]
pub struct KeyPage {
    /// Keys in listing order.
    pub entries: Vec<ListedKey>,
    /// True if the listing has more keys beyond this page.
    pub truncated: bool,
}

/// A paginated listing service.
///
/// Listers are **snapshot enumerators**: they expose the current state of a
/// keyspace, ordered by an opaque per-key marker. The provider owns all
/// payload interpretation; listers hand back raw bytes.
///
/// # Invariants
///
/// - Keys are returned in marker order
/// - `list_keys` returns keys strictly after `from`
/// - `truncated` is false only once the listing is exhausted
pub trait KeyLister: Send + Sync {
    /// Lists up to `max` keys strictly after `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying listing service fails.
    fn list_keys(&self, from: &Marker, max: usize) -> SipResult<KeyPage>;
}

/// An in-memory listing service.
///
/// Suitable for unit tests, integration tests, and embedding syncinfo over a
/// keyspace that already lives in memory. Thread-safe.
#[derive(Debug, Default)]
pub struct MemoryKeyLister {
    entries: RwLock<BTreeMap<Marker, ListedKey>>,
    page_size: usize,
}

impl MemoryKeyLister {
    /// Creates an empty lister with the default page size.
    pub fn new() -> Self {
        Self::with_page_size(1000)
    }

    /// Creates an empty lister that returns at most `page_size` keys per round.
    ///
    /// Small page sizes force multi-round aggregation in the provider, which
    /// is useful for testing budget handling.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
        }
    }

    /// Inserts a key with a payload, assigning the next listing marker.
    pub fn insert(&self, key: impl Into<String>, data: Vec<u8>) -> Marker {
        let mut entries = self.entries.write();
        let marker = Marker::new(format!("{:08}", entries.len() + 1));
        entries.insert(
            marker.clone(),
            ListedKey {
                key: key.into(),
                marker: marker.clone(),
                data,
            },
        );
        marker
    }

    /// Returns the number of listed keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the keyspace is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyLister for MemoryKeyLister {
    fn list_keys(&self, from: &Marker, max: usize) -> SipResult<KeyPage> {
        let entries = self.entries.read();
        let limit = max.min(self.page_size);

        let mut page = KeyPage::default();
        // range is inclusive on the left; skip the marker itself
        for (marker, listed) in entries.range(from.clone()..) {
            if marker == from {
                continue;
            }
            if page.entries.len() == limit {
                page.truncated = true;
                return Ok(page);
            }
            page.entries.push(listed.clone());
        }
        Ok(page)
    }
}
