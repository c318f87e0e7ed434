use std::time::Duration;

use url::Url;

use crate::args::HarnessArgs;
use crate::error::{AppResult, ConfigError};
use crate::report::Threshold;
use crate::scenario::{FailurePolicy, Scenario, ScenarioName, builtin};
use crate::sched::Stage;

use super::types::{ConfigFile, ScenarioOverrides};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fully resolved run parameters. Built once at startup; every validation
/// failure surfaces here, before a single virtual user starts.
pub struct RunPlan {
    pub scenario: Scenario,
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub max_duration: Option<Duration>,
    pub seed: Option<u64>,
}

/// Merges CLI arguments over the config file over the built-in scenario
/// defaults.
///
/// # Errors
///
/// Returns an error for an invalid base URL, unknown scenario keys in the
/// config, malformed stages or thresholds, an empty stage list, or
/// non-positive timeouts.
pub fn build_plan(args: &HarnessArgs, config: Option<&ConfigFile>) -> AppResult<RunPlan> {
    if let Some(scenarios) = config.and_then(|file| file.scenarios.as_ref()) {
        for key in scenarios.keys() {
            key.parse::<ScenarioName>()?;
        }
    }

    let mut scenario = builtin(args.scenario);
    let overrides = config
        .and_then(|file| file.scenarios.as_ref())
        .and_then(|scenarios| scenarios.get(scenario.name));
    if let Some(overrides) = overrides {
        apply_overrides(&mut scenario, overrides)?;
    }

    if !args.stages.is_empty() {
        scenario.stages = args.stages.clone();
    }
    if !args.thresholds.is_empty() {
        scenario.thresholds = args.thresholds.clone();
    }
    if let Some(pause) = args.pause {
        scenario.pause = pause;
    }
    if args.fail_on_check {
        scenario.failure_policy = FailurePolicy::AnyCheckFailure;
    }
    if scenario.stages.is_empty() {
        return Err(ConfigError::EmptyStages.into());
    }

    let base_url = resolve_base_url(args, config)?;

    let request_timeout = resolve_duration(
        args.request_timeout,
        config.and_then(|file| file.request_timeout.as_ref().map(super::DurationValue::to_duration))
            .transpose()?,
        DEFAULT_REQUEST_TIMEOUT,
        "request-timeout",
    )?;
    let connect_timeout = resolve_duration(
        args.connect_timeout,
        config.and_then(|file| file.connect_timeout.as_ref().map(super::DurationValue::to_duration))
            .transpose()?,
        DEFAULT_CONNECT_TIMEOUT,
        "connect-timeout",
    )?;

    let max_duration = match args.max_duration {
        Some(duration) => Some(duration),
        None => config
            .and_then(|file| file.max_duration.as_ref().map(super::DurationValue::to_duration))
            .transpose()?,
    };
    if let Some(duration) = max_duration
        && duration.is_zero()
    {
        return Err(ConfigError::DurationZero {
            field: "max-duration",
        }
        .into());
    }

    let seed = args.seed.or_else(|| config.and_then(|file| file.seed));

    Ok(RunPlan {
        scenario,
        base_url,
        request_timeout,
        connect_timeout,
        max_duration,
        seed,
    })
}

fn apply_overrides(scenario: &mut Scenario, overrides: &ScenarioOverrides) -> AppResult<()> {
    if let Some(stages) = &overrides.stages {
        let mut parsed = Vec::with_capacity(stages.len());
        for stage in stages {
            parsed.push(Stage::new(stage.duration.to_duration()?, stage.target));
        }
        scenario.stages = parsed;
    }
    if let Some(thresholds) = &overrides.thresholds {
        let mut parsed = Vec::with_capacity(thresholds.len());
        for expression in thresholds {
            parsed.push(Threshold::parse(expression)?);
        }
        scenario.thresholds = parsed;
    }
    if let Some(pause) = &overrides.pause {
        scenario.pause = pause.to_duration()?;
    }
    if let Some(policy) = &overrides.failure_policy {
        scenario.failure_policy = policy.parse()?;
    }
    Ok(())
}

fn resolve_base_url(args: &HarnessArgs, config: Option<&ConfigFile>) -> AppResult<String> {
    let raw = args
        .base_url
        .as_deref()
        .or_else(|| config.and_then(|file| file.base_url.as_deref()))
        .unwrap_or(DEFAULT_BASE_URL)
        .trim()
        .to_owned();

    // Parsed only to validate; requests use plain string concatenation so a
    // base with its own path prefix is preserved.
    let parsed = Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl {
        value: raw.clone(),
        source,
    })?;
    if parsed.cannot_be_a_base() {
        return Err(ConfigError::BaseUrlCannotBeBase { value: raw }.into());
    }
    Ok(raw)
}

fn resolve_duration(
    cli: Option<Duration>,
    file: Option<Duration>,
    default: Duration,
    field: &'static str,
) -> AppResult<Duration> {
    let duration = cli.or(file).unwrap_or(default);
    if duration.is_zero() {
        return Err(ConfigError::DurationZero { field }.into());
    }
    Ok(duration)
}
