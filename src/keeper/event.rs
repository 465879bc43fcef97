use std::fmt::{Display, Formatter};

use url::Url;

use crate::github::webhook::WebhookError;
use crate::policy::POLICY_FILE_PATH;

const TAG_REF_PREFIX: &str = "refs/tags/";

/// Event kinds accepted from the `x-github-event` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Ping,
    PullRequest,
    Push,
}

impl EventKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "ping" => Some(Self::Ping),
            "pull_request" => Some(Self::PullRequest),
            "push" => Some(Self::Push),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum WebhookEvent {
    Ping,
    PullRequest(PullRequestEvent),
    Push(PushEvent),
}

impl WebhookEvent {
    /// Decodes the webhook body according to the declared event kind.
    pub fn decode(kind: &str, body: &[u8]) -> Result<Self, WebhookError> {
        let Some(event_kind) = EventKind::parse(kind) else {
            return Err(WebhookError::UnsupportedEvent(kind.to_string()));
        };
        let event = match event_kind {
            EventKind::Ping => Self::Ping,
            EventKind::PullRequest => Self::PullRequest(serde_json::from_slice(body)?),
            EventKind::Push => Self::Push(serde_json::from_slice(body)?),
        };
        Ok(event)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            WebhookEvent::Ping => EventKind::Ping,
            WebhookEvent::PullRequest(_) => EventKind::PullRequest,
            WebhookEvent::Push(_) => EventKind::Push,
        }
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestAction {
    Opened,
    Edited,
    Synchronize,
    #[serde(other)]
    Other,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct WebhookRepository {
    pub full_name: String,
    /// API URL of the repository (`https://api.github.com/repos/{owner}/{repo}`).
    pub url: String,
    /// URL template, e.g. `https://api.github.com/repos/{owner}/{repo}/contents/{+path}`.
    pub contents_url: String,
    /// URL template, e.g. `https://api.github.com/repos/{owner}/{repo}/releases{/id}`.
    pub releases_url: String,
}

impl WebhookRepository {
    /// URL of a file in the repository, optionally at a specific git reference.
    pub fn content_url(&self, path: &str, git_ref: Option<&str>) -> String {
        let url = self
            .contents_url
            .replace("{+path}", path.trim_start_matches('/'));
        match git_ref {
            Some(git_ref) => match Url::parse(&url) {
                Ok(mut parsed) => {
                    parsed.query_pairs_mut().append_pair("ref", git_ref);
                    parsed.to_string()
                }
                Err(error) => {
                    tracing::warn!("Repository contents URL `{url}` is invalid: {error:?}");
                    url
                }
            },
            None => url,
        }
    }

    pub fn releases_url(&self) -> String {
        self.releases_url.replace("{/id}", "")
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub name: String,
    pub sha: String,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct WebhookPullRequest {
    pub title: String,
    pub body: Option<String>,
    /// API URL of the pull request.
    pub url: String,
    pub statuses_url: String,
    pub head: GitRef,
    pub base: GitRef,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct PullRequestEvent {
    pub action: PullRequestAction,
    pub number: u64,
    pub pull_request: WebhookPullRequest,
    pub repository: WebhookRepository,
}

impl PullRequestEvent {
    pub fn base_branch(&self) -> &str {
        &self.pull_request.base.name
    }

    pub fn title(&self) -> &str {
        &self.pull_request.title
    }

    pub fn description(&self) -> &str {
        self.pull_request.body.as_deref().unwrap_or_default()
    }

    pub fn status_url(&self) -> &str {
        &self.pull_request.statuses_url
    }

    pub fn review_url(&self) -> String {
        format!("{}/reviews", self.pull_request.url.trim_end_matches('/'))
    }

    /// The policy of a pull request is read from its base branch.
    pub fn policy_url(&self) -> String {
        self.repository
            .content_url(POLICY_FILE_PATH, Some(self.base_branch()))
    }
}

impl Display for PullRequestEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.repository.full_name, self.number)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub after: String,
    pub repository: WebhookRepository,
}

impl PushEvent {
    /// Name of the pushed tag, if this push created or moved a tag.
    pub fn tag_name(&self) -> Option<&str> {
        self.git_ref.strip_prefix(TAG_REF_PREFIX)
    }

    /// The policy of a push is read from the default branch.
    pub fn policy_url(&self) -> String {
        self.repository.content_url(POLICY_FILE_PATH, None)
    }
}
