use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .toml or .json extension.")]
    MissingExtension,
    #[error("Invalid base URL '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Base URL '{value}' cannot be a base for request paths.")]
    BaseUrlCannotBeBase { value: String },
    #[error("Unknown scenario '{name}' in config. Known scenarios: {known}.")]
    UnknownScenario { name: String, known: String },
    #[error("Stage list must contain at least one stage.")]
    EmptyStages,
    #[error("Invalid stage '{value}'. Expected 'duration:target' (e.g., 10s:50).")]
    InvalidStage { value: String },
    #[error("Invalid stage target '{value}': {source}")]
    InvalidStageTarget {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid threshold '{value}'. Expected '<metric><op><bound>' (e.g., p(95)<500).")]
    InvalidThreshold { value: String },
    #[error("Unknown threshold metric '{metric}'. Use p(N), rate, avg, min, or max.")]
    UnknownThresholdMetric { metric: String },
    #[error("Invalid threshold percentile '{value}'. Must be in 1..=99.")]
    InvalidPercentile { value: String },
    #[error("Invalid threshold bound '{value}': {source}")]
    InvalidThresholdBound {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("Invalid failure policy '{value}'. Use 'status' or 'checks'.")]
    InvalidFailurePolicy { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("'{field}' must be > 0.")]
    DurationZero { field: &'static str },
}
