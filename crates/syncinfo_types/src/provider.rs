//! Provider identity and summary types.

use crate::stage::{StageId, StageInfo};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a provider instance.
///
/// `provider_type` names the stream (e.g. `"data.inc"`); `data_type` names
/// what the entries describe (e.g. `"data"`); `instance` disambiguates
/// multiple independent streams of the same type, such as per-zone streams.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId {
    /// Name of the provider.
    pub provider_type: String,
    /// Kind of data the provider's entries describe.
    pub data_type: String,
    /// Optional instance discriminator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProviderId {
    /// Creates a provider identity without an instance discriminator.
    pub fn new(provider_type: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            provider_type: provider_type.into(),
            data_type: data_type.into(),
            instance: None,
        }
    }

    /// Sets the instance discriminator.
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "{}:{}", self.provider_type, instance),
            None => f.write_str(&self.provider_type),
        }
    }
}

/// Summary of a provider: identity plus stage topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider identity.
    #[serde(flatten)]
    pub id: ProviderId,
    /// First stage a consumer should traverse.
    pub first_stage: StageId,
    /// Stages in traversal order.
    pub stages: Vec<StageInfo>,
}
