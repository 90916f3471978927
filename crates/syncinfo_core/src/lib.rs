//! # syncinfo core
//!
//! Change-stream providers, per-consumer marker tracking, and the provider
//! registry.
//!
//! A **provider** exposes a logical, possibly multi-stage, multi-shard
//! stream of change events. Consumers fetch entries after a resumable
//! marker, record their progress in the [`MarkerTracker`], and trim consumed
//! history. Two data sources hide behind the one contract:
//!
//! - [`FullProvider`]: one-shot enumeration of a listed keyspace
//!   (bootstrap), via the [`KeyLister`] collaborator
//! - [`IncrementalProvider`]: unbounded tail of a sharded append log, via
//!   the [`ShardedLog`] collaborator
//!
//! [`StagedProvider`] chains both under one identity so a consumer can
//! bootstrap from the full stage and then follow the incremental one.
//!
//! All operations are request-synchronous; long pagination and trim loops
//! honor a cooperative [`CancelToken`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cancel;
mod codec;
mod error;
mod full;
mod incremental;
mod lister;
mod log;
mod marker;
mod provider;
mod registry;

pub use cancel::CancelToken;
pub use codec::EntryCodec;
pub use error::{SipError, SipResult};
pub use full::FullProvider;
pub use incremental::IncrementalProvider;
pub use lister::{KeyLister, KeyPage, ListedKey, MemoryKeyLister};
pub use log::{LogHead, LogPage, LogRecord, MemoryShardedLog, ShardedLog, TrimProgress};
pub use marker::{
    MarkerInfo, MarkerKey, MarkerStore, MarkerTracker, MemoryMarkerStore, ModifyResult,
    SetMarkerParams, TargetMarker,
};
pub use provider::{SipProvider, StagedProvider};
pub use registry::{ProviderRegistry, RegistryBuilder};
