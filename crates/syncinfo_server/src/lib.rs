//! # syncinfo server
//!
//! Transport-independent wire adapter for syncinfo providers.
//!
//! This crate maps REST-style requests (verb + query parameters + optional
//! JSON body) onto registry lookups, provider fetch/trim/status calls, and
//! marker-tracker operations, and shapes the JSON responses. It owns no
//! sockets: an HTTP front end parses the request into a [`SipRequest`] and
//! forwards it to [`SipService::handle`].
//!
//! # Protocol
//!
//! | Verb | Parameters | Operation |
//! |---|---|---|
//! | GET | — | list providers |
//! | GET | `provider` or `data-type`+`stage-type`, `info` | provider info |
//! | GET | `provider`, `status`, `stage-id`[, `shard-id`] | stage status |
//! | GET | `provider`, `marker-info`, `stage-id`[, `shard-id`] | marker info |
//! | PUT | `provider`, `marker-info`, `stage-id`[, `shard-id`], body | set marker |
//! | DELETE | `provider`, `stage-id`[, `shard-id`], `target-id` | remove target |
//! | GET | `provider`[, `stage-id`, `shard-id`, `marker`, `max`] | fetch |
//! | DELETE | `provider`[, `stage-id`, `shard-id`, `marker`] | trim |

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod request;
mod service;

pub use config::ServiceConfig;
pub use error::{WireError, WireResult};
pub use request::{Method, SipRequest};
pub use service::SipService;
