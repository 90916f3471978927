//! Stage identity and topology types.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a stage within a provider.
pub type StageId = String;

/// The kind of data stream a stage produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageType {
    /// One-shot enumeration of current state; completes once exhausted.
    #[serde(rename = "full")]
    Full,
    /// Unbounded tail of mutation events; never completes.
    #[serde(rename = "inc")]
    Incremental,
}

impl StageType {
    /// Wire name of the stage type.
    pub fn as_str(&self) -> &'static str {
        match self {
            StageType::Full => "full",
            StageType::Incremental => "inc",
        }
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageType {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(StageType::Full),
            "inc" => Ok(StageType::Incremental),
            other => Err(TypesError::UnknownStageType(other.to_string())),
        }
    }
}

/// Topology of one stage of a provider's stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInfo {
    /// Stage identifier, unique within the provider.
    pub sid: StageId,
    /// Kind of stream the stage produces.
    #[serde(rename = "type")]
    pub stage_type: StageType,
    /// Number of independently cursored shards. Fixed for the stage lifetime.
    pub num_shards: u32,
}

impl StageInfo {
    /// Creates a stage descriptor.
    pub fn new(sid: impl Into<StageId>, stage_type: StageType, num_shards: u32) -> Self {
        Self {
            sid: sid.into(),
            stage_type,
            num_shards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_type_round_trip() {
        assert_eq!("full".parse::<StageType>().unwrap(), StageType::Full);
        assert_eq!("inc".parse::<StageType>().unwrap(), StageType::Incremental);
        assert_eq!(StageType::Full.as_str(), "full");
        assert_eq!(StageType::Incremental.as_str(), "inc");
    }

    #[test]
    fn stage_type_rejects_unknown() {
        let err = "bulk".parse::<StageType>().unwrap_err();
        assert!(err.to_string().contains("bulk"));
    }

    #[test]
    fn stage_info_json_shape() {
        let info = StageInfo::new("data.inc", StageType::Incremental, 4);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["sid"], "data.inc");
        assert_eq!(json["type"], "inc");
        assert_eq!(json["num_shards"], 4);
    }
}
