use reqwest::Client;
use tokio::time::Instant;
use tracing::debug;

use crate::metrics::{RequestOutcome, RequestStatus};
use crate::scenario::{CheckedResponse, FailurePolicy, HttpMethod, RequestPlan, Scenario};

/// Joins the base URL and a request path by plain concatenation, so a base
/// with its own path prefix is preserved.
#[must_use]
pub fn join_url(base_url: &str, path_and_query: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{}{}", base, path_and_query)
}

/// Executes one scenario iteration and folds the response into an outcome.
///
/// The measured duration covers the full exchange including reading the
/// body, since the body feeds the checks. Transport errors and timeouts
/// become failed outcomes with every check marked false; they never
/// propagate.
pub async fn execute_iteration(
    client: &Client,
    base_url: &str,
    scenario: &Scenario,
    plan: RequestPlan,
) -> RequestOutcome {
    let url = join_url(base_url, &plan.path_and_query);
    let request = match plan.method {
        HttpMethod::Get => client.get(&url),
        HttpMethod::Post => {
            let builder = client.post(&url);
            match plan.body {
                Some(body) => builder.json(&body),
                None => builder,
            }
        }
    };

    let start = Instant::now();
    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => return failed_outcome(scenario, start, &err),
    };
    let status = response.status().as_u16();
    let raw_body = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => return failed_outcome(scenario, start, &err),
    };
    outcome_from_response(scenario, start, status, &raw_body)
}

/// Folds a completed response into an outcome. Under the default policy
/// only a status mismatch marks the outcome failed; failed body checks are
/// recorded but count toward the error rate only under `AnyCheckFailure`.
fn outcome_from_response(
    scenario: &Scenario,
    start: Instant,
    status: u16,
    raw_body: &[u8],
) -> RequestOutcome {
    let checked = CheckedResponse::parse(status, raw_body);

    let check_results: Vec<bool> = scenario
        .checks
        .iter()
        .map(|check| check.evaluate(&checked))
        .collect();

    let status_mismatch = status != scenario.expected_status;
    let failed = match scenario.failure_policy {
        FailurePolicy::ExpectedStatusOnly => status_mismatch,
        FailurePolicy::AnyCheckFailure => {
            status_mismatch || check_results.iter().any(|passed| !passed)
        }
    };

    RequestOutcome::new(start, RequestStatus::Completed(status), failed, check_results)
}

fn failed_outcome(scenario: &Scenario, start: Instant, err: &reqwest::Error) -> RequestOutcome {
    let status = if err.is_timeout() {
        RequestStatus::TimedOut
    } else {
        RequestStatus::TransportError
    };
    debug!("Request failed: {}", err);
    RequestOutcome::new(start, status, true, vec![false; scenario.checks.len()])
}
