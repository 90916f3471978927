//! Request dispatch onto providers and the marker tracker.

use crate::config::ServiceConfig;
use crate::error::{WireError, WireResult};
use crate::request::{Method, SipRequest};
use serde_json::{json, Value};
use std::sync::Arc;
use syncinfo_core::{
    CancelToken, MarkerTracker, ProviderRegistry, SetMarkerParams, SipProvider,
};
use syncinfo_types::{Marker, StageType};
use tracing::debug;

/// The sync-info service: routes parsed requests onto registry, provider,
/// and marker-tracker operations and shapes JSON responses.
///
/// Successful mutations (set marker, remove target, trim) return
/// [`Value::Null`]; the transport emits the status with no body.
pub struct SipService {
    registry: Arc<ProviderRegistry>,
    tracker: MarkerTracker,
    config: ServiceConfig,
}

impl SipService {
    /// Creates a service over a registry and tracker with default config.
    pub fn new(registry: Arc<ProviderRegistry>, tracker: MarkerTracker) -> Self {
        Self {
            registry,
            tracker,
            config: ServiceConfig::default(),
        }
    }

    /// Replaces the service configuration.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Handles one request.
    ///
    /// # Errors
    ///
    /// [`WireError`] describes the failure; [`WireError::status`] gives the
    /// stable external status.
    pub fn handle(&self, req: &SipRequest, cancel: &CancelToken) -> WireResult<Value> {
        match req.method {
            Method::Get => {
                if req.param("provider").is_none()
                    && !req.has("data-type")
                    && !req.has("stage-type")
                {
                    return self.list();
                }
                if req.has("info") {
                    return self.info(req);
                }
                // everything past this point addresses one provider
                req.require("provider")?;
                if req.has("status") {
                    return self.stage_status(req);
                }
                if req.has("marker-info") {
                    return self.marker_info(req);
                }
                self.fetch(req, cancel)
            }
            Method::Put => {
                req.require("provider")?;
                if req.has("marker-info") {
                    return self.set_marker(req);
                }
                Err(WireError::UnknownOperation)
            }
            Method::Delete => {
                req.require("provider")?;
                if req.has("target-id") {
                    return self.remove_target(req);
                }
                self.trim(req, cancel)
            }
        }
    }

    fn resolve(&self, req: &SipRequest) -> WireResult<Arc<SipProvider>> {
        let provider_type = req.require("provider")?;
        let instance = req.param("instance");
        self.registry.find(provider_type, instance).ok_or_else(|| {
            debug!(provider = provider_type, "sync info provider not found");
            WireError::Sip(syncinfo_core::SipError::not_found(format!(
                "provider {provider_type}"
            )))
        })
    }

    fn list(&self) -> WireResult<Value> {
        Ok(json!({ "providers": self.registry.list() }))
    }

    fn info(&self, req: &SipRequest) -> WireResult<Value> {
        let provider = match req.param("provider") {
            Some(_) => self.resolve(req)?,
            None => {
                let data_type = req.require("data-type")?;
                let stage_type: StageType = req
                    .require("stage-type")?
                    .parse()
                    .map_err(|err| WireError::InvalidParam {
                        name: "stage-type",
                        message: format!("{err}"),
                    })?;
                let instance = req.param("instance");
                self.registry
                    .find_by_type(data_type, stage_type, instance)
                    .ok_or_else(|| {
                        WireError::Sip(syncinfo_core::SipError::not_found(format!(
                            "provider for data type {data_type}"
                        )))
                    })?
            }
        };
        Ok(json!({ "info": provider.info() }))
    }

    fn stage_status(&self, req: &SipRequest) -> WireResult<Value> {
        let provider = self.resolve(req)?;
        let stage_id = req.require("stage-id")?;
        let shard_id = req.u32_param("shard-id", 0)?;

        let start = provider.start_marker(stage_id, shard_id)?;
        let state = provider.current_state(stage_id, shard_id)?;
        Ok(json!({
            "markers": {
                "start": start,
                "current": {
                    "marker": state.marker,
                    "timestamp": state.timestamp,
                },
            },
            "disabled": state.disabled,
        }))
    }

    fn marker_info(&self, req: &SipRequest) -> WireResult<Value> {
        let provider = self.resolve(req)?;
        let stage_id = req.require("stage-id")?;
        let shard_id = req.u32_param("shard-id", 0)?;

        let info = self.tracker.get_info(provider.id(), stage_id, shard_id)?;
        Ok(json!({ "targets": info.targets }))
    }

    fn set_marker(&self, req: &SipRequest) -> WireResult<Value> {
        let provider = self.resolve(req)?;
        let stage_id = req.require("stage-id")?;
        let shard_id = req.u32_param("shard-id", 0)?;

        if req.body.len() > self.config.max_marker_body {
            return Err(WireError::BodyTooLarge {
                limit: self.config.max_marker_body,
            });
        }
        let params: SetMarkerParams =
            serde_json::from_slice(&req.body).map_err(WireError::MalformedBody)?;

        self.tracker
            .set_marker(provider.id(), stage_id, shard_id, params)?;
        Ok(Value::Null)
    }

    fn remove_target(&self, req: &SipRequest) -> WireResult<Value> {
        let provider = self.resolve(req)?;
        let stage_id = req.require("stage-id")?;
        let shard_id = req.u32_param("shard-id", 0)?;
        let target_id = req.require("target-id")?;

        self.tracker
            .remove_target(provider.id(), target_id, stage_id, shard_id)?;
        Ok(Value::Null)
    }

    fn fetch(&self, req: &SipRequest, cancel: &CancelToken) -> WireResult<Value> {
        let provider = self.resolve(req)?;
        let stage_id = req
            .param("stage-id")
            .map(str::to_string)
            .unwrap_or_else(|| provider.first_stage());
        let shard_id = req.u32_param("shard-id", 0)?;
        let max = req.usize_param("max", self.config.default_max_entries)?;
        let marker = req.param("marker").map(Marker::from);

        let result = provider.fetch(&stage_id, shard_id, marker.as_ref(), max, cancel)?;

        let mut entries = Vec::with_capacity(result.entries.len());
        for entry in &result.entries {
            entries.push(json!({
                "key": entry.key,
                "info": entry.info_value().map_err(syncinfo_core::SipError::from)?,
            }));
        }
        Ok(json!({
            "entries": entries,
            "more": result.more,
            "done": result.done,
        }))
    }

    fn trim(&self, req: &SipRequest, cancel: &CancelToken) -> WireResult<Value> {
        let provider = self.resolve(req)?;
        let stage_id = req
            .param("stage-id")
            .map(str::to_string)
            .unwrap_or_else(|| provider.first_stage());
        let shard_id = req.u32_param("shard-id", 0)?;
        let marker = req.param("marker").map(Marker::from).unwrap_or_default();

        provider.trim(&stage_id, shard_id, &marker, cancel)?;
        Ok(Value::Null)
    }
}
