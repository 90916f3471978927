//! # syncinfo types
//!
//! Protocol types shared by the syncinfo provider core and its wire adapter.
//!
//! This crate provides:
//! - [`Marker`] and [`Timestamp`] cursor primitives
//! - Stage and provider identity types ([`StageInfo`], [`ProviderId`], [`ProviderInfo`])
//! - Fetch result types ([`Entry`], [`FetchResult`])
//! - Typed entry payloads and their JSON codec ([`DataChangeInfo`], [`MetaSnapshotInfo`])
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entry;
mod error;
mod marker;
mod payload;
mod provider;
mod stage;

pub use entry::{Entry, FetchResult};
pub use error::{TypesError, TypesResult};
pub use marker::{Marker, MarkerPosition, ShardState, Timestamp};
pub use payload::{DataChangeInfo, EntryPayload, MetaSnapshotInfo};
pub use provider::{ProviderId, ProviderInfo};
pub use stage::{StageId, StageInfo, StageType};
