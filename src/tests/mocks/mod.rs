use crate::keeper::event::{PullRequestEvent, PushEvent};
use crate::tests::load_test_file;

mod client;
mod notifier;
mod policy;

pub use client::{ApiCall, ApiCalls, CallKind, MockRepositoryClient};
pub use notifier::MockNotifier;
pub use policy::TestPolicy;

/// `opened` pull request from `octo-org/octo-repo` targeting `main`.
pub fn pull_request_event() -> PullRequestEvent {
    serde_json::from_str(&load_test_file("webhook/pull-request-opened.json")).unwrap()
}

/// Push to the `main` branch of `octo-org/octo-repo`.
pub fn push_event() -> PushEvent {
    serde_json::from_str(&load_test_file("webhook/push-branch.json")).unwrap()
}
