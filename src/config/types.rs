use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

use super::parse::parse_duration_value;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub request_timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub max_duration: Option<DurationValue>,
    pub seed: Option<u64>,
    /// Per-scenario overrides, keyed by scenario name.
    pub scenarios: Option<BTreeMap<String, ScenarioOverrides>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ScenarioOverrides {
    pub stages: Option<Vec<StageConfig>>,
    pub thresholds: Option<Vec<String>>,
    pub pause: Option<DurationValue>,
    pub failure_policy: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StageConfig {
    pub duration: DurationValue,
    pub target: u32,
}

/// Duration in config files: either a bare number of seconds or a string
/// with a unit suffix (`"500ms"`, `"10s"`, `"1m"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ConfigError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
