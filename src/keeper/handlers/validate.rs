use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use itertools::Itertools;

use crate::github::{CommitStatus, Review, StatusState};
use crate::keeper::event::PullRequestEvent;
use crate::keeper::RepositoryClient;
use crate::policy::Policy;
use crate::utils::logging::LogFailure;
use crate::utils::timing::run_bounded;

pub(crate) const VALIDATION_CONTEXT: &str = "doorkeeper/validate";
const VALIDATION_DESCRIPTION: &str = "Validate pull request";
const VALIDATION_TIMEOUT: Duration = Duration::from_secs(3 * 60);

pub(crate) const VALIDATION_FAILED_HEADER: &str = ":robot: PR Validation Failed!";
const CRASHED_VIOLATION: &str = "Validation crashed unexpectedly";

/// Validates the title and description of a pull request and reports the result
/// through a commit status and, on failure, a review comment.
///
/// If the timeout elapses, the in-flight request is dropped and the status may stay `pending`.
pub(super) async fn validate_pull_request(
    client: Arc<dyn RepositoryClient>,
    event: PullRequestEvent,
    policy: Arc<Policy>,
) {
    run_bounded(
        "validate pull request",
        VALIDATION_TIMEOUT,
        run_validation(client.as_ref(), &event, &policy),
    )
    .await;
}

async fn run_validation(client: &dyn RepositoryClient, event: &PullRequestEvent, policy: &Policy) {
    run_checks(client, event, || check_pull_request(event, policy)).await;
}

/// Wraps `checks` between the pending status and the final report.
async fn run_checks<F>(client: &dyn RepositoryClient, event: &PullRequestEvent, checks: F)
where
    F: FnOnce() -> Vec<String>,
{
    // There is no status to finalize if the pending one cannot be created.
    let pending = client
        .post_status(event.status_url(), &validation_status(StatusState::Pending))
        .await
        .log_failure("Cannot create pending status");
    if pending.is_none() {
        return;
    }

    // The final status is reported even if checking the pull request panics.
    let violations = std::panic::catch_unwind(AssertUnwindSafe(checks))
        .unwrap_or_else(|_| vec![CRASHED_VIOLATION.to_string()]);

    report_result(client, event, &violations).await;
}

/// Runs every check and collects all violations.
fn check_pull_request(event: &PullRequestEvent, policy: &Policy) -> Vec<String> {
    [
        policy.validate_title(event.title()),
        policy.validate_description(event.description()),
    ]
    .into_iter()
    .filter_map(|result| result.err())
    .map(|error| error.to_string())
    .collect()
}

async fn report_result(client: &dyn RepositoryClient, event: &PullRequestEvent, violations: &[String]) {
    if violations.is_empty() {
        client
            .post_status(event.status_url(), &validation_status(StatusState::Success))
            .await
            .log_failure("Cannot update status to success");
        return;
    }

    tracing::info!("Pull request has {} violation(s)", violations.len());
    client
        .post_status(event.status_url(), &validation_status(StatusState::Failure))
        .await
        .log_failure("Cannot update status to failure");
    client
        .post_review(&event.review_url(), &Review::comment(failure_message(violations)))
        .await
        .log_failure("Cannot post review comment");
}

fn validation_status(state: StatusState) -> CommitStatus {
    CommitStatus::new(state, VALIDATION_CONTEXT, VALIDATION_DESCRIPTION)
}

fn failure_message(violations: &[String]) -> String {
    format!(
        "{VALIDATION_FAILED_HEADER}\n{}",
        violations.iter().map(|violation| format!("- {violation}")).join("\n")
    )
}
