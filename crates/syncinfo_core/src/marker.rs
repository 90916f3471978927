//! Per-consumer marker tracking.
//!
//! Each downstream consumer ("target") holds an independent progress record
//! per `(provider, stage, shard)` tuple. The tracker stores whatever marker
//! the target reports; monotonicity, if desired, is the caller's
//! responsibility. None of the targets owns the underlying log.

use crate::error::{SipError, SipResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use syncinfo_types::{Marker, ProviderId, StageId, Timestamp};

/// Key of one record map: all targets of one stage shard of one provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerKey {
    /// Provider identity, rendered as `provider_type[:instance]`.
    pub provider: String,
    /// Stage within the provider.
    pub stage_id: StageId,
    /// Shard within the stage.
    pub shard_id: u32,
}

impl MarkerKey {
    /// Builds the key for a provider's stage shard.
    pub fn new(provider: &ProviderId, stage_id: impl Into<StageId>, shard_id: u32) -> Self {
        Self {
            provider: provider.to_string(),
            stage_id: stage_id.into(),
            shard_id,
        }
    }
}

/// One consumer's progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMarker {
    /// Consumer identifier.
    pub target_id: String,
    /// The consumer's reported position.
    pub marker: Marker,
    /// Wall-clock hint for the position.
    pub timestamp: Timestamp,
}

/// Parameters of a set-marker call; also the wire body of marker updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMarkerParams {
    /// Consumer identifier; must be non-empty.
    pub target_id: String,
    /// Position to record.
    #[serde(default)]
    pub marker: Marker,
    /// Wall-clock hint for the position.
    #[serde(default)]
    pub timestamp: Timestamp,
}

/// Outcome of a marker mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyResult {
    /// True if a record was created or updated.
    pub modified: bool,
}

/// All target records of one stage shard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerInfo {
    /// Records keyed by target id.
    pub targets: BTreeMap<String, TargetMarker>,
}

/// Durable store of per-consumer marker records.
///
/// Records for different [`MarkerKey`] tuples are independent; the store
/// serializes concurrent writers to the same tuple (last write wins).
pub trait MarkerStore: Send + Sync {
    /// Returns all target records under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    fn get(&self, key: &MarkerKey) -> SipResult<MarkerInfo>;

    /// Creates or replaces `target`'s record under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    fn set(&self, key: &MarkerKey, target: TargetMarker) -> SipResult<ModifyResult>;

    /// Removes `target_id`'s record under `key`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the target has no record.
    fn remove(&self, key: &MarkerKey, target_id: &str) -> SipResult<ModifyResult>;
}

/// An in-memory marker store.
///
/// Thread-safe; suitable for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryMarkerStore {
    records: RwLock<HashMap<MarkerKey, BTreeMap<String, TargetMarker>>>,
}

impl MemoryMarkerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkerStore for MemoryMarkerStore {
    fn get(&self, key: &MarkerKey) -> SipResult<MarkerInfo> {
        let records = self.records.read();
        Ok(MarkerInfo {
            targets: records.get(key).cloned().unwrap_or_default(),
        })
    }

    fn set(&self, key: &MarkerKey, target: TargetMarker) -> SipResult<ModifyResult> {
        let mut records = self.records.write();
        records
            .entry(key.clone())
            .or_default()
            .insert(target.target_id.clone(), target);
        Ok(ModifyResult { modified: true })
    }

    fn remove(&self, key: &MarkerKey, target_id: &str) -> SipResult<ModifyResult> {
        let mut records = self.records.write();
        let removed = records
            .get_mut(key)
            .and_then(|targets| targets.remove(target_id))
            .is_some();
        if !removed {
            return Err(SipError::not_found(format!("target {target_id}")));
        }
        Ok(ModifyResult { modified: true })
    }
}

/// Tracks per-consumer progress markers across providers.
#[derive(Clone)]
pub struct MarkerTracker {
    store: Arc<dyn MarkerStore>,
}

impl MarkerTracker {
    /// Creates a tracker over `store`.
    pub fn new(store: Arc<dyn MarkerStore>) -> Self {
        Self { store }
    }

    /// Creates a tracker over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryMarkerStore::new()))
    }

    /// Returns all target records for a provider's stage shard.
    pub fn get_info(
        &self,
        provider: &ProviderId,
        stage_id: &str,
        shard_id: u32,
    ) -> SipResult<MarkerInfo> {
        self.store.get(&MarkerKey::new(provider, stage_id, shard_id))
    }

    /// Creates or updates a target's marker record.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `target_id` is empty.
    pub fn set_marker(
        &self,
        provider: &ProviderId,
        stage_id: &str,
        shard_id: u32,
        params: SetMarkerParams,
    ) -> SipResult<ModifyResult> {
        if params.target_id.is_empty() {
            return Err(SipError::invalid_argument("target_id must not be empty"));
        }
        let target = TargetMarker {
            target_id: params.target_id,
            marker: params.marker,
            timestamp: params.timestamp,
        };
        self.store
            .set(&MarkerKey::new(provider, stage_id, shard_id), target)
    }

    /// Removes a target's marker record.
    ///
    /// # Errors
    ///
    /// `NotFound` if the target has no record for this stage shard.
    pub fn remove_target(
        &self,
        provider: &ProviderId,
        target_id: &str,
        stage_id: &str,
        shard_id: u32,
    ) -> SipResult<ModifyResult> {
        self.store
            .remove(&MarkerKey::new(provider, stage_id, shard_id), target_id)
    }
}
