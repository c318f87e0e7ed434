use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;
use crate::metrics::MetricsAggregate;

/// Aggregated metric a threshold is expressed over. Latency metrics are in
/// milliseconds; `ErrorRate` is a fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdMetric {
    Percentile(u8),
    ErrorRate,
    AvgLatency,
    MinLatency,
    MaxLatency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    const fn apply(self, value: f64, bound: f64) -> bool {
        match self {
            Comparator::Lt => value < bound,
            Comparator::Le => value <= bound,
            Comparator::Gt => value > bound,
            Comparator::Ge => value >= bound,
        }
    }
}

/// A pass/fail condition over the final aggregate, in the load-test
/// shorthand `p(95)<500`, `rate<0.01`, `avg<=250`, etc. Evaluated once at
/// run end; a failing threshold never aborts an in-progress run.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub metric: ThresholdMetric,
    pub comparator: Comparator,
    pub bound: f64,
}

impl Threshold {
    #[must_use]
    pub const fn new(metric: ThresholdMetric, comparator: Comparator, bound: f64) -> Self {
        Self {
            metric,
            comparator,
            bound,
        }
    }

    /// Parses a threshold expression such as `p(95)<500` or `rate<0.05`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when the expression, metric name,
    /// percentile, or bound cannot be parsed.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        let (metric_part, comparator, bound_part) = split_expression(trimmed)
            .ok_or_else(|| ConfigError::InvalidThreshold {
                value: input.to_owned(),
            })?;

        let metric = parse_metric(metric_part.trim())?;
        let bound_text = bound_part.trim();
        let bound: f64 =
            bound_text
                .parse()
                .map_err(|source| ConfigError::InvalidThresholdBound {
                    value: bound_text.to_owned(),
                    source,
                })?;

        Ok(Self::new(metric, comparator, bound))
    }

    #[must_use]
    pub fn evaluate(&self, aggregate: &MetricsAggregate) -> bool {
        let value = match self.metric {
            ThresholdMetric::Percentile(p) => micros_to_ms(aggregate.percentile_micros(p)),
            ThresholdMetric::ErrorRate => aggregate.error_rate(),
            ThresholdMetric::AvgLatency => micros_to_ms(aggregate.avg_micros()),
            ThresholdMetric::MinLatency => micros_to_ms(aggregate.min_micros),
            ThresholdMetric::MaxLatency => micros_to_ms(aggregate.max_micros),
        };
        self.comparator.apply(value, self.bound)
    }
}

fn split_expression(input: &str) -> Option<(&str, Comparator, &str)> {
    // Two-character comparators first so "<=" is not read as "<" + "=".
    for (token, comparator) in [
        ("<=", Comparator::Le),
        (">=", Comparator::Ge),
        ("<", Comparator::Lt),
        (">", Comparator::Gt),
    ] {
        if let Some((left, right)) = input.split_once(token) {
            return Some((left, comparator, right));
        }
    }
    None
}

fn parse_metric(input: &str) -> Result<ThresholdMetric, ConfigError> {
    match input {
        "rate" => return Ok(ThresholdMetric::ErrorRate),
        "avg" => return Ok(ThresholdMetric::AvgLatency),
        "min" => return Ok(ThresholdMetric::MinLatency),
        "max" => return Ok(ThresholdMetric::MaxLatency),
        _ => {}
    }
    if let Some(inner) = input.strip_prefix("p(").and_then(|rest| rest.strip_suffix(')')) {
        let percentile: u8 = inner
            .trim()
            .parse()
            .map_err(|_parse| ConfigError::InvalidPercentile {
                value: inner.to_owned(),
            })?;
        if !(1..=99).contains(&percentile) {
            return Err(ConfigError::InvalidPercentile {
                value: inner.to_owned(),
            });
        }
        return Ok(ThresholdMetric::Percentile(percentile));
    }
    Err(ConfigError::UnknownThresholdMetric {
        metric: input.to_owned(),
    })
}

const fn micros_to_ms(micros: u64) -> f64 {
    micros as f64 / 1000.0
}

impl fmt::Display for ThresholdMetric {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdMetric::Percentile(p) => write!(formatter, "p({})", p),
            ThresholdMetric::ErrorRate => write!(formatter, "rate"),
            ThresholdMetric::AvgLatency => write!(formatter, "avg"),
            ThresholdMetric::MinLatency => write!(formatter, "min"),
            ThresholdMetric::MaxLatency => write!(formatter, "max"),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        };
        write!(formatter, "{}", token)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}{}{}", self.metric, self.comparator, self.bound)
    }
}

/// Result of one threshold evaluation, serialized into the summary.
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdResult {
    pub expression: String,
    pub passed: bool,
}

/// Evaluates every threshold against the final aggregate. The overall
/// result is the AND of the individual outcomes; an empty list passes.
#[must_use]
pub fn evaluate_thresholds(
    thresholds: &[Threshold],
    aggregate: &MetricsAggregate,
) -> (Vec<ThresholdResult>, bool) {
    let results: Vec<ThresholdResult> = thresholds
        .iter()
        .map(|threshold| ThresholdResult {
            expression: threshold.to_string(),
            passed: threshold.evaluate(aggregate),
        })
        .collect();
    let passed = results.iter().all(|result| result.passed);
    (results, passed)
}
