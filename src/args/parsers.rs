use std::time::Duration;

use crate::config::parse_duration_value;
use crate::error::ConfigError;
use crate::report::Threshold;
use crate::sched::Stage;

pub(crate) fn parse_duration_arg(s: &str) -> Result<Duration, ConfigError> {
    parse_duration_value(s)
}

/// Parses a stage in `duration:target` form, e.g. `10s:50` or `500ms:0`.
pub(crate) fn parse_stage_arg(s: &str) -> Result<Stage, ConfigError> {
    // rsplit so a future unit containing ':' cannot shadow the target.
    let (duration_part, target_part) =
        s.rsplit_once(':').ok_or_else(|| ConfigError::InvalidStage {
            value: s.to_owned(),
        })?;
    let duration = parse_duration_value(duration_part)?;
    let target: u32 =
        target_part
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidStageTarget {
                value: target_part.to_owned(),
                source,
            })?;
    Ok(Stage::new(duration, target))
}

pub(crate) fn parse_threshold_arg(s: &str) -> Result<Threshold, ConfigError> {
    Threshold::parse(s)
}
