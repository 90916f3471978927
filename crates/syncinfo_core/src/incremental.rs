//! Incremental tailing provider over a sharded append log.

use crate::cancel::CancelToken;
use crate::codec::EntryCodec;
use crate::error::{SipError, SipResult};
use crate::log::{ShardedLog, TrimProgress};
use std::sync::Arc;
use syncinfo_types::{
    Entry, FetchResult, Marker, MarkerPosition, ShardState, StageId, StageInfo, StageType,
};
use tracing::{debug, warn};

/// A provider that tails mutation events from a sharded append log.
///
/// The stream is unbounded: `done` is never reported. Shard count is taken
/// from the log at construction and fixed for the provider's lifetime.
pub struct IncrementalProvider {
    stage: StageInfo,
    codec: EntryCodec,
    log: Arc<dyn ShardedLog>,
}

impl IncrementalProvider {
    /// Creates an incremental provider over `log`.
    pub fn new(sid: impl Into<StageId>, codec: EntryCodec, log: Arc<dyn ShardedLog>) -> Self {
        let num_shards = log.num_shards();
        Self {
            stage: StageInfo::new(sid, StageType::Incremental, num_shards),
            codec,
            log,
        }
    }

    /// Topology of the single stage.
    pub fn stage_info(&self) -> &StageInfo {
        &self.stage
    }

    fn check_shard(&self, shard: u32) -> SipResult<()> {
        if shard >= self.stage.num_shards {
            return Err(SipError::Range {
                shard,
                num_shards: self.stage.num_shards,
            });
        }
        Ok(())
    }

    /// Fetches up to `max` log entries on `shard` strictly after `marker`.
    ///
    /// A shard whose stream does not exist yet yields a clean empty result.
    /// Records that fail the payload codec are skipped with a warning, but
    /// the cursor still advances past them.
    pub fn fetch(
        &self,
        shard: u32,
        marker: Option<&Marker>,
        max: usize,
        cancel: &CancelToken,
    ) -> SipResult<FetchResult> {
        self.check_shard(shard)?;

        let mut result = FetchResult::default();
        let mut pos = marker.cloned().unwrap_or_default();
        let mut budget = max;
        let mut truncated = false;

        loop {
            cancel.check()?;

            let page = match self.log.list_entries(shard, &pos, budget)? {
                Some(page) => page,
                None => {
                    // stream not written yet; nothing to report
                    truncated = false;
                    break;
                }
            };

            budget -= page.entries.len();
            // advance past everything scanned, decodable or not
            pos = page.end_marker;
            truncated = page.truncated;

            for record in page.entries {
                if let Err(err) = self.codec.check(&record.data) {
                    warn!(
                        stage = %self.stage.sid,
                        shard,
                        id = %record.id,
                        %err,
                        "skipping log record with undecodable payload"
                    );
                    continue;
                }
                result.entries.push(Entry::new(record.id, record.data));
            }

            if !truncated || budget == 0 {
                break;
            }
        }

        result.more = truncated;
        result.done = false;
        Ok(result)
    }

    /// Earliest retained position.
    ///
    /// Always the zero position: the provider does not track a
    /// retained-since watermark separately from what trimming has removed.
    pub fn start_marker(&self, shard: u32) -> SipResult<MarkerPosition> {
        self.check_shard(shard)?;
        Ok(MarkerPosition::zero())
    }

    /// Latest known position of `shard`.
    ///
    /// A shard with no data yet is not an error; it reports the zero marker,
    /// enabled.
    pub fn current_state(&self, shard: u32) -> SipResult<ShardState> {
        self.check_shard(shard)?;
        let head = self.log.head(shard)?;
        Ok(match head {
            Some(head) => ShardState {
                marker: head.marker,
                timestamp: head.last_update,
                disabled: false,
            },
            None => ShardState::default(),
        })
    }

    /// Removes all entries at or before `marker` from `shard`.
    ///
    /// The log may cap how much it deletes per call, so this loops until the
    /// log reports nothing left to remove. Idempotent: trimming an
    /// already-trimmed or empty range succeeds with no effect.
    pub fn trim(&self, shard: u32, marker: &Marker, cancel: &CancelToken) -> SipResult<()> {
        self.check_shard(shard)?;

        let mut rounds = 0u64;
        loop {
            cancel.check()?;
            match self.log.trim_entries(shard, marker)? {
                TrimProgress::Removed => {
                    rounds += 1;
                }
                TrimProgress::Exhausted => {
                    debug!(stage = %self.stage.sid, shard, rounds, "trim drained");
                    return Ok(());
                }
            }
        }
    }
}
