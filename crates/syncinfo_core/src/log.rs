//! Sharded append-log collaborator for incremental tailing.

use crate::error::{SipError, SipResult};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use syncinfo_types::{Marker, Timestamp};

/// One record read from a log shard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Log position of the record; resumes strictly after it.
    pub id: Marker,
    /// When the record was appended. Zero if unknown.
    pub timestamp: Timestamp,
    /// Raw record payload, decoded by the provider's payload codec.
    pub data: Vec<u8>,
}

/// One page of log records.
#[derive(Debug, Clone, Default)]
pub struct LogPage {
    /// Records in log order.
    pub entries: Vec<LogRecord>,
    /// Position of the last record scanned in this round.
    ///
    /// The provider advances its marker to this position even when
    /// individual records fail to decode, so a malformed record never wedges
    /// the cursor.
    pub end_marker: Marker,
    /// True if the shard has more records beyond this page.
    pub truncated: bool,
}

/// Head position of a log shard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogHead {
    /// Position of the most recently appended record.
    pub marker: Marker,
    /// When the shard was last written.
    pub last_update: Timestamp,
}

/// Outcome of one bounded trim round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimProgress {
    /// Records were removed; more may remain at or before the marker.
    Removed,
    /// Nothing at or before the marker remains.
    Exhausted,
}

/// A sharded append log.
///
/// Shards are independent: operations on shard `i` never observe or mutate
/// shard `j`. A shard whose stream has never been written is distinct from
/// an empty one; `list_entries` and `head` report it as `None`.
///
/// # Invariants
///
/// - Record ids are monotonically increasing within a shard
/// - `list_entries` returns records strictly after `from`
/// - `trim_entries` removes a bounded batch per call; callers loop until
///   [`TrimProgress::Exhausted`]
pub trait ShardedLog: Send + Sync {
    /// Number of shards. Fixed for the lifetime of the log.
    fn num_shards(&self) -> u32;

    /// Lists up to `max` records on `shard` strictly after `from`.
    ///
    /// Returns `None` if the shard's stream does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the shard is out of range or the log storage
    /// fails.
    fn list_entries(&self, shard: u32, from: &Marker, max: usize) -> SipResult<Option<LogPage>>;

    /// Returns the head position of `shard`, or `None` if the stream does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the shard is out of range or the log storage
    /// fails.
    fn head(&self, shard: u32) -> SipResult<Option<LogHead>>;

    /// Removes a bounded batch of records at or before `to` from `shard`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shard is out of range or the log storage
    /// fails. Trimming an empty or already-trimmed range is not an error; it
    /// reports [`TrimProgress::Exhausted`].
    fn trim_entries(&self, shard: u32, to: &Marker) -> SipResult<TrimProgress>;
}

#[derive(Debug, Default)]
struct ShardData {
    records: BTreeMap<Marker, LogRecord>,
    next_seq: u64,
    last_update: Timestamp,
    head: Marker,
    created: bool,
}

/// An in-memory sharded append log.
///
/// Suitable for unit tests, integration tests, and embedding syncinfo over
/// an in-process change log. Thread-safe; each shard has its own lock.
#[derive(Debug)]
pub struct MemoryShardedLog {
    shards: Vec<RwLock<ShardData>>,
    page_size: usize,
    trim_batch: usize,
}

impl MemoryShardedLog {
    /// Creates a log with `num_shards` shards and default batching.
    pub fn new(num_shards: u32) -> Self {
        Self::with_batching(num_shards, 1000, 1000)
    }

    /// Creates a log with explicit page and trim batch sizes.
    ///
    /// Small batches force multi-round aggregation in the provider's fetch
    /// and trim loops.
    pub fn with_batching(num_shards: u32, page_size: usize, trim_batch: usize) -> Self {
        let shards = (0..num_shards.max(1))
            .map(|_| RwLock::new(ShardData::default()))
            .collect();
        Self {
            shards,
            page_size: page_size.max(1),
            trim_batch: trim_batch.max(1),
        }
    }

    fn shard(&self, shard: u32) -> SipResult<&RwLock<ShardData>> {
        self.shards.get(shard as usize).ok_or(SipError::Range {
            shard,
            num_shards: self.num_shards(),
        })
    }

    /// Appends a record to `shard`, returning its log position.
    pub fn append(
        &self,
        shard: u32,
        data: Vec<u8>,
        timestamp: Timestamp,
    ) -> SipResult<Marker> {
        let lock = self.shard(shard)?;
        let mut state = lock.write();
        state.next_seq += 1;
        let id = Marker::new(format!("1_{:016}", state.next_seq));
        state.records.insert(
            id.clone(),
            LogRecord {
                id: id.clone(),
                timestamp,
                data,
            },
        );
        state.last_update = timestamp;
        state.head = id.clone();
        state.created = true;
        Ok(id)
    }

    /// Number of retained records on `shard`.
    pub fn shard_len(&self, shard: u32) -> SipResult<usize> {
        Ok(self.shard(shard)?.read().records.len())
    }
}

impl ShardedLog for MemoryShardedLog {
    fn num_shards(&self) -> u32 {
        self.shards.len() as u32
    }

    fn list_entries(&self, shard: u32, from: &Marker, max: usize) -> SipResult<Option<LogPage>> {
        let lock = self.shard(shard)?;
        let state = lock.read();
        if !state.created {
            return Ok(None);
        }

        let limit = max.min(self.page_size);
        let mut page = LogPage {
            end_marker: from.clone(),
            ..Default::default()
        };
        for (id, record) in state.records.range(from.clone()..) {
            if id == from {
                continue;
            }
            if page.entries.len() == limit {
                page.truncated = true;
                break;
            }
            page.end_marker = id.clone();
            page.entries.push(record.clone());
        }
        Ok(Some(page))
    }

    fn head(&self, shard: u32) -> SipResult<Option<LogHead>> {
        let lock = self.shard(shard)?;
        let state = lock.read();
        if !state.created {
            return Ok(None);
        }
        Ok(Some(LogHead {
            marker: state.head.clone(),
            last_update: state.last_update,
        }))
    }

    fn trim_entries(&self, shard: u32, to: &Marker) -> SipResult<TrimProgress> {
        let lock = self.shard(shard)?;
        let mut state = lock.write();

        let doomed: Vec<Marker> = state
            .records
            .range(..=to.clone())
            .take(self.trim_batch)
            .map(|(id, _)| id.clone())
            .collect();
        if doomed.is_empty() {
            return Ok(TrimProgress::Exhausted);
        }
        for id in doomed {
            state.records.remove(&id);
        }
        Ok(TrimProgress::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_shard_has_no_stream() {
        let log = MemoryShardedLog::new(4);
        assert!(log.list_entries(2, &Marker::zero(), 10).unwrap().is_none());
        assert!(log.head(2).unwrap().is_none());
    }

    #[test]
    fn append_and_list_in_order() {
        let log = MemoryShardedLog::new(2);
        let m1 = log.append(0, vec![1], Timestamp(10)).unwrap();
        let m2 = log.append(0, vec![2], Timestamp(20)).unwrap();
        assert!(m1 < m2);

        let page = log.list_entries(0, &Marker::zero(), 10).unwrap().unwrap();
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].id, m1);
        assert_eq!(page.end_marker, m2);
        assert!(!page.truncated);
    }

    #[test]
    fn list_resumes_strictly_after_marker() {
        let log = MemoryShardedLog::new(1);
        let m1 = log.append(0, vec![1], Timestamp::zero()).unwrap();
        let m2 = log.append(0, vec![2], Timestamp::zero()).unwrap();

        let page = log.list_entries(0, &m1, 10).unwrap().unwrap();
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].id, m2);
    }

    #[test]
    fn truncation_reports_more() {
        let log = MemoryShardedLog::with_batching(1, 2, 1000);
        for i in 0..5 {
            log.append(0, vec![i], Timestamp::zero()).unwrap();
        }

        let page = log.list_entries(0, &Marker::zero(), 10).unwrap().unwrap();
        assert_eq!(page.entries.len(), 2);
        assert!(page.truncated);
    }

    #[test]
    fn shards_are_independent() {
        let log = MemoryShardedLog::new(2);
        log.append(0, vec![1], Timestamp::zero()).unwrap();
        assert!(log.list_entries(1, &Marker::zero(), 10).unwrap().is_none());
        assert_eq!(log.shard_len(0).unwrap(), 1);
    }

    #[test]
    fn head_tracks_last_append() {
        let log = MemoryShardedLog::new(1);
        log.append(0, vec![1], Timestamp(5)).unwrap();
        let m2 = log.append(0, vec![2], Timestamp(9)).unwrap();

        let head = log.head(0).unwrap().unwrap();
        assert_eq!(head.marker, m2);
        assert_eq!(head.last_update, Timestamp(9));
    }

    #[test]
    fn bounded_trim_until_exhausted() {
        let log = MemoryShardedLog::with_batching(1, 1000, 2);
        let mut last = Marker::zero();
        for i in 0..5 {
            last = log.append(0, vec![i], Timestamp::zero()).unwrap();
        }

        assert_eq!(log.trim_entries(0, &last).unwrap(), TrimProgress::Removed);
        assert_eq!(log.trim_entries(0, &last).unwrap(), TrimProgress::Removed);
        assert_eq!(log.trim_entries(0, &last).unwrap(), TrimProgress::Removed);
        assert_eq!(
            log.trim_entries(0, &last).unwrap(),
            TrimProgress::Exhausted
        );
        assert_eq!(log.shard_len(0).unwrap(), 0);

        // head survives a full trim
        assert_eq!(log.head(0).unwrap().unwrap().marker, last);
    }

    #[test]
    fn trim_is_inclusive_of_marker() {
        let log = MemoryShardedLog::new(1);
        let m1 = log.append(0, vec![1], Timestamp::zero()).unwrap();
        let m2 = log.append(0, vec![2], Timestamp::zero()).unwrap();

        while log.trim_entries(0, &m1).unwrap() == TrimProgress::Removed {}
        let page = log.list_entries(0, &Marker::zero(), 10).unwrap().unwrap();
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].id, m2);
    }

    #[test]
    fn out_of_range_shard_errors() {
        let log = MemoryShardedLog::new(4);
        assert!(matches!(
            log.list_entries(99, &Marker::zero(), 10),
            Err(SipError::Range { shard: 99, .. })
        ));
    }
}
