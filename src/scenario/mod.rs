//! Built-in load-test scenarios for the meal-planning API: the request each
//! virtual-user iteration issues, the checks applied to its response, and
//! the default load profile and thresholds.
mod builtins;
mod checks;
mod payload;

use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use rand::Rng;
use serde_json::Value;

use crate::error::ConfigError;
use crate::report::Threshold;
use crate::sched::Stage;

pub use builtins::builtin;
pub use checks::{
    Check, CheckedResponse, CountPositive, FieldIsArray, FieldPresent, FlagIsTrue, StatusIs,
};
pub use payload::{
    BULK_INSERT_ITEM_COUNT, BulkInsertPayload, MealItem, TEMPLATE_IDS, bulk_insert_payload,
    foods_category_filter, template_id,
};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ScenarioName {
    Categories,
    FoodsList,
    TemplateFull,
    BulkInsert,
}

impl ScenarioName {
    pub const ALL: [ScenarioName; 4] = [
        ScenarioName::Categories,
        ScenarioName::FoodsList,
        ScenarioName::TemplateFull,
        ScenarioName::BulkInsert,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ScenarioName::Categories => "categories",
            ScenarioName::FoodsList => "foods-list",
            ScenarioName::TemplateFull => "template-full",
            ScenarioName::BulkInsert => "bulk-insert",
        }
    }
}

impl FromStr for ScenarioName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        Self::ALL
            .iter()
            .find(|name| name.as_str() == normalized)
            .copied()
            .ok_or_else(|| ConfigError::UnknownScenario {
                name: s.to_owned(),
                known: Self::ALL
                    .iter()
                    .map(|name| name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl std::fmt::Display for ScenarioName {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Which outcomes count toward the error rate. By default only unexpected
/// statuses and transport failures count; body-shape checks are always
/// recorded but only fail a request under `AnyCheckFailure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    ExpectedStatusOnly,
    AnyCheckFailure,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(FailurePolicy::ExpectedStatusOnly),
            "checks" => Ok(FailurePolicy::AnyCheckFailure),
            _ => Err(ConfigError::InvalidFailurePolicy {
                value: s.to_owned(),
            }),
        }
    }
}

/// One materialized request, ready for the executor.
#[derive(Debug)]
pub struct RequestPlan {
    pub method: HttpMethod,
    pub path_and_query: String,
    pub body: Option<Value>,
}

/// Request construction per scenario; randomness flows through the caller's
/// RNG so seeded runs are reproducible.
#[derive(Debug, Clone, Copy)]
pub enum RequestKind {
    Categories,
    FoodsList,
    TemplateFull,
    BulkInsert,
}

impl RequestKind {
    #[must_use]
    pub fn build<R: Rng>(self, rng: &mut R) -> RequestPlan {
        match self {
            RequestKind::Categories => RequestPlan {
                method: HttpMethod::Get,
                path_and_query: "/api/categories".to_owned(),
                body: None,
            },
            RequestKind::FoodsList => {
                let path = foods_category_filter(rng).map_or_else(
                    || "/api/foods".to_owned(),
                    |category| format!("/api/foods?category_id={}", category),
                );
                RequestPlan {
                    method: HttpMethod::Get,
                    path_and_query: path,
                    body: None,
                }
            }
            RequestKind::TemplateFull => RequestPlan {
                method: HttpMethod::Get,
                path_and_query: format!("/api/templates/{}/full", template_id(rng)),
                body: None,
            },
            RequestKind::BulkInsert => {
                let payload = bulk_insert_payload(rng, BULK_INSERT_ITEM_COUNT);
                RequestPlan {
                    method: HttpMethod::Post,
                    path_and_query: "/api/benchmark/bulk-insert".to_owned(),
                    body: serde_json::to_value(payload).ok(),
                }
            }
        }
    }
}

/// One test case: request shape, checks, pacing, load profile, and
/// thresholds. Immutable once the run plan is built.
pub struct Scenario {
    pub name: &'static str,
    pub kind: RequestKind,
    pub expected_status: u16,
    pub failure_policy: FailurePolicy,
    pub checks: Vec<Box<dyn Check>>,
    pub pause: Duration,
    pub stages: Vec<Stage>,
    pub thresholds: Vec<Threshold>,
}

impl Scenario {
    #[must_use]
    pub fn check_names(&self) -> Vec<String> {
        self.checks.iter().map(|check| check.name().to_owned()).collect()
    }
}
