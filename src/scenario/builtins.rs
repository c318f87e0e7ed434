use std::time::Duration;

use crate::report::{Comparator, Threshold, ThresholdMetric};
use crate::sched::Stage;

use super::{
    Check, CountPositive, FailurePolicy, FieldIsArray, FieldPresent, FlagIsTrue, RequestKind,
    Scenario, ScenarioName, StatusIs,
};

const RAMP_UP: Duration = Duration::from_secs(10);
const STEADY: Duration = Duration::from_secs(30);
const RAMP_DOWN: Duration = Duration::from_secs(10);

fn ramp(target: u32) -> Vec<Stage> {
    vec![
        Stage::new(RAMP_UP, target),
        Stage::new(STEADY, target),
        Stage::new(RAMP_DOWN, 0),
    ]
}

const fn percentile_under(percentile: u8, bound_ms: f64) -> Threshold {
    Threshold::new(
        ThresholdMetric::Percentile(percentile),
        Comparator::Lt,
        bound_ms,
    )
}

const fn error_rate_under(bound: f64) -> Threshold {
    Threshold::new(ThresholdMetric::ErrorRate, Comparator::Lt, bound)
}

/// Default configuration for each built-in scenario: stage list,
/// thresholds, pacing, and checks.
#[must_use]
pub fn builtin(name: ScenarioName) -> Scenario {
    match name {
        ScenarioName::Categories => Scenario {
            name: name.as_str(),
            kind: RequestKind::Categories,
            expected_status: 200,
            failure_policy: FailurePolicy::default(),
            checks: vec![
                Box::new(StatusIs::new(200)) as Box<dyn Check>,
                Box::new(FlagIsTrue::new("has success", "/success")),
                Box::new(FieldIsArray::new("has categories", "/categories")),
            ],
            pause: Duration::from_millis(100),
            stages: ramp(50),
            thresholds: vec![percentile_under(95, 500.0), error_rate_under(0.01)],
        },
        ScenarioName::FoodsList => Scenario {
            name: name.as_str(),
            kind: RequestKind::FoodsList,
            expected_status: 200,
            failure_policy: FailurePolicy::default(),
            checks: vec![
                Box::new(StatusIs::new(200)) as Box<dyn Check>,
                Box::new(FlagIsTrue::new("has success", "/success")),
                Box::new(FieldIsArray::new("has foods array", "/foods")),
            ],
            pause: Duration::from_millis(100),
            stages: ramp(50),
            thresholds: vec![percentile_under(95, 1000.0), error_rate_under(0.01)],
        },
        ScenarioName::TemplateFull => Scenario {
            name: name.as_str(),
            kind: RequestKind::TemplateFull,
            expected_status: 200,
            failure_policy: FailurePolicy::default(),
            checks: vec![
                Box::new(StatusIs::new(200)) as Box<dyn Check>,
                Box::new(FlagIsTrue::new("has success", "/success")),
                Box::new(FieldPresent::new("has template", "/template")),
                Box::new(FieldIsArray::new("has days array", "/template/days")),
            ],
            pause: Duration::from_millis(200),
            stages: ramp(30),
            thresholds: vec![percentile_under(95, 2000.0), error_rate_under(0.01)],
        },
        ScenarioName::BulkInsert => Scenario {
            name: name.as_str(),
            kind: RequestKind::BulkInsert,
            expected_status: 201,
            failure_policy: FailurePolicy::default(),
            checks: vec![
                Box::new(StatusIs::new(201)) as Box<dyn Check>,
                Box::new(FlagIsTrue::new("has success", "/success")),
                Box::new(CountPositive::new("items inserted", "/inserted_count")),
            ],
            pause: Duration::from_millis(500),
            stages: ramp(10),
            thresholds: vec![percentile_under(95, 3000.0), error_rate_under(0.05)],
        },
    }
}
