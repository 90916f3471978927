//! Full-enumeration provider over a paginated listing service.

use crate::cancel::CancelToken;
use crate::codec::EntryCodec;
use crate::error::{SipError, SipResult};
use crate::lister::KeyLister;
use std::sync::Arc;
use syncinfo_types::{
    Entry, FetchResult, Marker, MarkerPosition, ShardState, StageId, StageInfo, StageType,
};
use tracing::warn;

/// A provider that enumerates the current state of a listed keyspace.
///
/// The enumeration is single-shard and one-shot: repeated fetches walk the
/// keyspace in marker order and eventually report `done=true`, after which
/// the stage never produces new entries.
pub struct FullProvider {
    stage: StageInfo,
    codec: EntryCodec,
    lister: Arc<dyn KeyLister>,
}

impl FullProvider {
    /// Creates a full-enumeration provider over `lister`.
    pub fn new(sid: impl Into<StageId>, codec: EntryCodec, lister: Arc<dyn KeyLister>) -> Self {
        Self {
            stage: StageInfo::new(sid, StageType::Full, 1),
            codec,
            lister,
        }
    }

    /// Topology of the single stage.
    pub fn stage_info(&self) -> &StageInfo {
        &self.stage
    }

    fn check_shard(&self, shard: u32) -> SipResult<()> {
        if shard != 0 {
            return Err(SipError::Range {
                shard,
                num_shards: 1,
            });
        }
        Ok(())
    }

    /// Fetches up to `max` entries strictly after `marker`.
    ///
    /// Aggregates as many listing rounds as the budget allows. Records that
    /// fail the payload codec are skipped with a warning; they never abort
    /// the batch.
    pub fn fetch(
        &self,
        shard: u32,
        marker: Option<&Marker>,
        max: usize,
        cancel: &CancelToken,
    ) -> SipResult<FetchResult> {
        self.check_shard(shard)?;

        let mut result = FetchResult {
            more: true,
            ..Default::default()
        };
        let mut pos = marker.cloned().unwrap_or_default();
        let mut budget = max;

        while budget > 0 {
            cancel.check()?;

            let page = self.lister.list_keys(&pos, budget)?;
            if page.entries.is_empty() {
                result.more = page.truncated;
                result.done = !page.truncated;
                break;
            }

            budget -= page.entries.len();
            pos = page.entries[page.entries.len() - 1].marker.clone();

            for listed in page.entries {
                if let Err(err) = self.codec.check(&listed.data) {
                    warn!(
                        stage = %self.stage.sid,
                        key = %listed.key,
                        %err,
                        "skipping entry with undecodable payload"
                    );
                    continue;
                }
                result.entries.push(Entry::new(listed.marker, listed.data));
            }

            if !page.truncated {
                result.done = true;
                result.more = false;
                break;
            }
        }

        Ok(result)
    }

    /// Trim is not meaningful for a one-shot enumeration.
    ///
    /// Always errors with [`SipError::Unsupported`] so consumers never
    /// silently assume space was reclaimed.
    pub fn trim(&self, shard: u32, _marker: &Marker) -> SipResult<()> {
        self.check_shard(shard)?;
        Err(SipError::unsupported(
            "trim is not supported on a full-enumeration stage",
        ))
    }

    /// Earliest retained position: always the zero position.
    pub fn start_marker(&self, shard: u32) -> SipResult<MarkerPosition> {
        self.check_shard(shard)?;
        Ok(MarkerPosition::zero())
    }

    /// A listing has no head position; reports the zero marker, enabled.
    ///
    /// `done` from [`fetch`](Self::fetch) is the completion signal for full
    /// stages.
    pub fn current_state(&self, shard: u32) -> SipResult<ShardState> {
        self.check_shard(shard)?;
        Ok(ShardState::default())
    }
}
