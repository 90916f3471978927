//! The provider abstraction: a closed set of variants behind one contract.

use crate::cancel::CancelToken;
use crate::error::{SipError, SipResult};
use crate::full::FullProvider;
use crate::incremental::IncrementalProvider;
use syncinfo_types::{
    FetchResult, Marker, MarkerPosition, ProviderId, ProviderInfo, ShardState, StageId, StageInfo,
};

/// A sync-info provider.
///
/// Providers form a closed set: a one-shot full enumeration, an unbounded
/// incremental tail, or an ordered chain of those under one identity. All
/// variants honor the same contract:
///
/// - `fetch` never returns more than the requested budget, aggregating
///   underlying pagination rounds as needed
/// - a marker returned by `fetch` is resumable: fetching from it yields
///   entries strictly after it
/// - `trim` fully drains everything at or before the marker, and is
///   idempotent
/// - shard operations are isolated: shard `i` never observes shard `j`
pub enum SipProvider {
    /// Bulk enumeration of current state.
    Full {
        /// Provider identity.
        id: ProviderId,
        /// The enumeration stage.
        stage: FullProvider,
    },
    /// Incremental tail of a sharded change log.
    Incremental {
        /// Provider identity.
        id: ProviderId,
        /// The tailing stage.
        stage: IncrementalProvider,
    },
    /// Ordered chain of stages (e.g. full bootstrap, then incremental tail).
    Staged(StagedProvider),
}

impl SipProvider {
    /// Creates a single-stage full-enumeration provider.
    pub fn full(id: ProviderId, stage: FullProvider) -> Self {
        Self::Full { id, stage }
    }

    /// Creates a single-stage incremental provider.
    pub fn incremental(id: ProviderId, stage: IncrementalProvider) -> Self {
        Self::Incremental { id, stage }
    }

    /// Provider identity.
    pub fn id(&self) -> &ProviderId {
        match self {
            SipProvider::Full { id, .. } => id,
            SipProvider::Incremental { id, .. } => id,
            SipProvider::Staged(staged) => &staged.id,
        }
    }

    /// Stages in traversal order.
    pub fn stages(&self) -> Vec<StageInfo> {
        match self {
            SipProvider::Full { stage, .. } => vec![stage.stage_info().clone()],
            SipProvider::Incremental { stage, .. } => vec![stage.stage_info().clone()],
            SipProvider::Staged(staged) => staged
                .stages
                .iter()
                .flat_map(|member| member.stages())
                .collect(),
        }
    }

    /// The first stage a consumer should traverse.
    pub fn first_stage(&self) -> StageId {
        match self {
            SipProvider::Full { stage, .. } => stage.stage_info().sid.clone(),
            SipProvider::Incremental { stage, .. } => stage.stage_info().sid.clone(),
            SipProvider::Staged(staged) => staged.stages[0].first_stage(),
        }
    }

    /// Identity plus stage topology.
    pub fn info(&self) -> ProviderInfo {
        ProviderInfo {
            id: self.id().clone(),
            first_stage: self.first_stage(),
            stages: self.stages(),
        }
    }

    /// Topology of `stage_id`, or `NotFound`.
    pub fn stage_info(&self, stage_id: &str) -> SipResult<StageInfo> {
        self.stages()
            .into_iter()
            .find(|stage| stage.sid == stage_id)
            .ok_or_else(|| SipError::not_found(format!("stage {stage_id}")))
    }

    fn check_stage(&self, stage_id: &str, expected: &StageInfo) -> SipResult<()> {
        if stage_id == expected.sid {
            Ok(())
        } else {
            Err(SipError::not_found(format!("stage {stage_id}")))
        }
    }

    /// Fetches up to `max` entries on `(stage_id, shard)` strictly after
    /// `marker`. `marker` absent means from the beginning of retained
    /// history.
    pub fn fetch(
        &self,
        stage_id: &str,
        shard: u32,
        marker: Option<&Marker>,
        max: usize,
        cancel: &CancelToken,
    ) -> SipResult<FetchResult> {
        if max == 0 {
            return Err(SipError::invalid_argument("max must be greater than zero"));
        }
        match self {
            SipProvider::Full { stage, .. } => {
                self.check_stage(stage_id, stage.stage_info())?;
                stage.fetch(shard, marker, max, cancel)
            }
            SipProvider::Incremental { stage, .. } => {
                self.check_stage(stage_id, stage.stage_info())?;
                stage.fetch(shard, marker, max, cancel)
            }
            SipProvider::Staged(staged) => staged
                .member(stage_id)?
                .fetch(stage_id, shard, marker, max, cancel),
        }
    }

    /// Removes all retained entries at or before `marker` from the shard.
    pub fn trim(
        &self,
        stage_id: &str,
        shard: u32,
        marker: &Marker,
        cancel: &CancelToken,
    ) -> SipResult<()> {
        match self {
            SipProvider::Full { stage, .. } => {
                self.check_stage(stage_id, stage.stage_info())?;
                stage.trim(shard, marker)
            }
            SipProvider::Incremental { stage, .. } => {
                self.check_stage(stage_id, stage.stage_info())?;
                stage.trim(shard, marker, cancel)
            }
            SipProvider::Staged(staged) => {
                staged.member(stage_id)?.trim(stage_id, shard, marker, cancel)
            }
        }
    }

    /// Earliest retained position of the shard.
    pub fn start_marker(&self, stage_id: &str, shard: u32) -> SipResult<MarkerPosition> {
        match self {
            SipProvider::Full { stage, .. } => {
                self.check_stage(stage_id, stage.stage_info())?;
                stage.start_marker(shard)
            }
            SipProvider::Incremental { stage, .. } => {
                self.check_stage(stage_id, stage.stage_info())?;
                stage.start_marker(shard)
            }
            SipProvider::Staged(staged) => staged.member(stage_id)?.start_marker(stage_id, shard),
        }
    }

    /// Latest known position of the shard.
    pub fn current_state(&self, stage_id: &str, shard: u32) -> SipResult<ShardState> {
        match self {
            SipProvider::Full { stage, .. } => {
                self.check_stage(stage_id, stage.stage_info())?;
                stage.current_state(shard)
            }
            SipProvider::Incremental { stage, .. } => {
                self.check_stage(stage_id, stage.stage_info())?;
                stage.current_state(shard)
            }
            SipProvider::Staged(staged) => staged.member(stage_id)?.current_state(stage_id, shard),
        }
    }
}

/// An ordered chain of single-stage providers under one identity.
///
/// Stage order defines the sequence a consumer must traverse, e.g. a full
/// bootstrap stage followed by an incremental tail.
pub struct StagedProvider {
    id: ProviderId,
    stages: Vec<SipProvider>,
}

impl StagedProvider {
    /// Chains `stages` under `id`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `stages` is empty, a member is itself staged, or
    /// stage ids collide.
    pub fn new(id: ProviderId, stages: Vec<SipProvider>) -> SipResult<Self> {
        if stages.is_empty() {
            return Err(SipError::invalid_argument(
                "staged provider requires at least one stage",
            ));
        }
        let mut seen = Vec::new();
        for member in &stages {
            if matches!(member, SipProvider::Staged(_)) {
                return Err(SipError::invalid_argument(
                    "staged provider members must be single-stage",
                ));
            }
            let sid = member.first_stage();
            if seen.contains(&sid) {
                return Err(SipError::invalid_argument(format!(
                    "duplicate stage id {sid}"
                )));
            }
            seen.push(sid);
        }
        Ok(Self { id, stages })
    }

    fn member(&self, stage_id: &str) -> SipResult<&SipProvider> {
        self.stages
            .iter()
            .find(|member| member.first_stage() == stage_id)
            .ok_or_else(|| SipError::not_found(format!("stage {stage_id}")))
    }
}

impl From<StagedProvider> for SipProvider {
    fn from(staged: StagedProvider) -> Self {
        SipProvider::Staged(staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::EntryCodec;
    use crate::lister::MemoryKeyLister;
    use crate::log::MemoryShardedLog;
    use std::sync::Arc;
    use syncinfo_types::{DataChangeInfo, EntryPayload, StageType, Timestamp};

    fn staged() -> SipProvider {
        let lister = Arc::new(MemoryKeyLister::new());
        let log = Arc::new(MemoryShardedLog::new(4));
        let id = ProviderId::new("data", "data");
        StagedProvider::new(
            id.clone(),
            vec![
                SipProvider::full(
                    id.clone(),
                    FullProvider::new("data.full", EntryCodec::MetaSnapshot, lister),
                ),
                SipProvider::incremental(
                    id,
                    IncrementalProvider::new("data.inc", EntryCodec::DataChange, log),
                ),
            ],
        )
        .unwrap()
        .into()
    }

    #[test]
    fn staged_orders_stages() {
        let provider = staged();
        let stages = provider.stages();
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].sid, "data.full");
        assert_eq!(stages[0].stage_type, StageType::Full);
        assert_eq!(stages[1].sid, "data.inc");
        assert_eq!(stages[1].num_shards, 4);
        assert_eq!(provider.first_stage(), "data.full");
    }

    #[test]
    fn staged_dispatches_by_stage_id() {
        let provider = staged();
        let result = provider
            .fetch("data.full", 0, None, 10, &CancelToken::new())
            .unwrap();
        assert!(result.done);

        let result = provider
            .fetch("data.inc", 2, None, 10, &CancelToken::new())
            .unwrap();
        assert!(!result.done);
    }

    #[test]
    fn unknown_stage_is_not_found() {
        let provider = staged();
        assert!(matches!(
            provider.fetch("data.bogus", 0, None, 10, &CancelToken::new()),
            Err(SipError::NotFound { .. })
        ));
    }

    #[test]
    fn zero_max_is_invalid() {
        let provider = staged();
        assert!(matches!(
            provider.fetch("data.inc", 0, None, 0, &CancelToken::new()),
            Err(SipError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn duplicate_stage_ids_rejected() {
        let id = ProviderId::new("data", "data");
        let result = StagedProvider::new(
            id.clone(),
            vec![
                SipProvider::full(
                    id.clone(),
                    FullProvider::new(
                        "data.full",
                        EntryCodec::MetaSnapshot,
                        Arc::new(MemoryKeyLister::new()),
                    ),
                ),
                SipProvider::full(
                    id,
                    FullProvider::new(
                        "data.full",
                        EntryCodec::MetaSnapshot,
                        Arc::new(MemoryKeyLister::new()),
                    ),
                ),
            ],
        );
        assert!(matches!(result, Err(SipError::InvalidArgument { .. })));
    }

    #[test]
    fn empty_staged_rejected() {
        let result = StagedProvider::new(ProviderId::new("data", "data"), vec![]);
        assert!(matches!(result, Err(SipError::InvalidArgument { .. })));
    }

    #[test]
    fn info_summarizes_topology() {
        let provider = staged();
        let info = provider.info();
        assert_eq!(info.id.provider_type, "data");
        assert_eq!(info.first_stage, "data.full");
        assert_eq!(info.stages.len(), 2);
    }

    #[test]
    fn staged_trim_reaches_incremental_stage() {
        let log = Arc::new(MemoryShardedLog::new(2));
        let m = log
            .append(
                0,
                DataChangeInfo {
                    key: "k".to_string(),
                    ..Default::default()
                }
                .encode()
                .unwrap(),
                Timestamp::zero(),
            )
            .unwrap();
        let id = ProviderId::new("data", "data");
        let provider: SipProvider = StagedProvider::new(
            id.clone(),
            vec![SipProvider::incremental(
                id,
                IncrementalProvider::new("data.inc", EntryCodec::DataChange, Arc::<MemoryShardedLog>::clone(&log)),
            )],
        )
        .unwrap()
        .into();

        provider
            .trim("data.inc", 0, &m, &CancelToken::new())
            .unwrap();
        assert_eq!(log.shard_len(0).unwrap(), 0);
    }
}
