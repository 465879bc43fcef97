//! Contains definitions of the GitHub API payloads needed for reporting statuses,
//! posting reviews and publishing release notes.
use std::fmt::{Display, Formatter};

pub mod api;
pub mod server;
pub mod webhook;

pub use webhook::WebhookSecret;

#[derive(serde::Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Pending,
    Success,
    Failure,
}

impl Display for StatusState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = match self {
            StatusState::Pending => "pending",
            StatusState::Success => "success",
            StatusState::Failure => "failure",
        };
        f.write_str(state)
    }
}

/// Commit status attached to the head commit of a pull request.
///
/// Documentation: https://docs.github.com/en/rest/commits/statuses#create-a-commit-status
#[derive(serde::Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CommitStatus {
    pub state: StatusState,
    pub context: String,
    pub description: String,
}

impl CommitStatus {
    pub fn new(state: StatusState, context: &str, description: &str) -> Self {
        Self {
            state,
            context: context.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(serde::Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    Comment,
}

/// Documentation: https://docs.github.com/en/rest/pulls/reviews#create-a-review-for-a-pull-request
#[derive(serde::Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Review {
    pub body: String,
    pub event: ReviewEvent,
}

impl Review {
    pub fn comment(body: String) -> Self {
        Self {
            body,
            event: ReviewEvent::Comment,
        }
    }
}

/// Documentation: https://docs.github.com/en/rest/releases/releases#generate-release-notes-content-for-a-release
#[derive(serde::Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ReleaseNotesRequest {
    pub tag_name: String,
    pub target_commitish: String,
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReleaseNotes {
    pub body: String,
}

/// Documentation: https://docs.github.com/en/rest/releases/releases#create-a-release
#[derive(serde::Serialize, Clone, Debug, PartialEq, Eq)]
pub struct NewRelease {
    pub tag_name: String,
    pub name: String,
    pub draft: bool,
    pub generate_release_notes: bool,
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Release {
    pub html_url: String,
}
