use clap::Parser;
use std::time::Duration;

use crate::report::Threshold;
use crate::scenario::ScenarioName;
use crate::sched::Stage;

use super::parsers::{parse_duration_arg, parse_stage_arg, parse_threshold_arg};

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "mealbench",
    version,
    about = "Load-test harness for the meal-planning API: staged virtual-user ramps, response checks, exact percentiles, and threshold-based pass/fail."
)]
pub struct HarnessArgs {
    /// Scenario to run
    #[arg(value_enum)]
    pub scenario: ScenarioName,

    /// Base URL of the API under test
    #[arg(long = "base-url", short = 'u', env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Path to a TOML or JSON config file (defaults to mealbench.toml / mealbench.json)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Override the stage list: 'duration:target', repeatable, in order (e.g., 10s:50)
    #[arg(long = "stage", value_name = "DURATION:TARGET", value_parser = parse_stage_arg)]
    pub stages: Vec<Stage>,

    /// Override the thresholds: k6-style expression, repeatable (e.g., 'p(95)<500')
    #[arg(long = "threshold", value_name = "EXPR", value_parser = parse_threshold_arg)]
    pub thresholds: Vec<Threshold>,

    /// Override the inter-iteration pause (supports ms/s/m/h)
    #[arg(long, value_parser = parse_duration_arg)]
    pub pause: Option<Duration>,

    /// RNG seed for reproducible payloads (virtual user i uses seed + i)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "request-timeout", value_parser = parse_duration_arg)]
    pub request_timeout: Option<Duration>,

    /// Connection timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", value_parser = parse_duration_arg)]
    pub connect_timeout: Option<Duration>,

    /// Hard run deadline; remaining virtual users are stopped when it passes
    #[arg(long = "max-duration", value_parser = parse_duration_arg)]
    pub max_duration: Option<Duration>,

    /// Count any failed check toward the error rate, not just status mismatches
    #[arg(long = "fail-on-check")]
    pub fail_on_check: bool,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
