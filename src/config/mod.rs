//! Optional config-file layer: TOML or JSON overrides merged underneath the
//! CLI and on top of the built-in scenario defaults.
mod apply;
mod loader;
mod parse;
mod types;

pub use apply::{
    DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, RunPlan, build_plan,
};
pub use loader::load_config;
pub use parse::parse_duration_value;
pub use types::{ConfigFile, DurationValue, ScenarioOverrides, StageConfig};
