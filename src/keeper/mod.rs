use std::sync::Arc;

use axum::async_trait;

use crate::github::{CommitStatus, NewRelease, Release, ReleaseNotes, ReleaseNotesRequest, Review};

pub mod event;
mod handlers;
mod notify;

pub use handlers::{handle_webhook_event, plan_jobs, Job};
pub use notify::{ChatNotifier, SlackNotifier};

/// Provides functionality for working with a remote repository.
/// All URLs are absolute API URLs taken from the webhook payload.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Download the text content of a file in a repository.
    async fn fetch_file(&self, content_url: &str) -> anyhow::Result<String>;

    /// Create a commit status.
    async fn post_status(&self, statuses_url: &str, status: &CommitStatus) -> anyhow::Result<()>;

    /// Create a review on a pull request.
    async fn post_review(&self, review_url: &str, review: &Review) -> anyhow::Result<()>;

    /// Let GitHub generate release notes for a commit of the repository.
    async fn generate_release_notes(
        &self,
        repository_url: &str,
        request: &ReleaseNotesRequest,
    ) -> anyhow::Result<ReleaseNotes>;

    /// Publish a release for a tag.
    async fn create_release(
        &self,
        releases_url: &str,
        release: &NewRelease,
    ) -> anyhow::Result<Release>;
}

/// Collaborators shared by the dispatcher and all workers it spawns.
pub struct KeeperContext {
    pub client: Arc<dyn RepositoryClient>,
    pub notifier: Option<Arc<dyn ChatNotifier>>,
}

impl KeeperContext {
    pub fn new(
        client: Arc<dyn RepositoryClient>,
        notifier: Option<Arc<dyn ChatNotifier>>,
    ) -> Self {
        Self { client, notifier }
    }
}
