use anyhow::Context;
use axum::async_trait;
use octocrab::models::repos::Content;
use octocrab::Octocrab;

use crate::github::{CommitStatus, NewRelease, Release, ReleaseNotes, ReleaseNotesRequest, Review};
use crate::keeper::RepositoryClient;

/// Accesses repositories through the GitHub REST API.
/// Every request goes to an absolute URL taken from the webhook payload.
pub struct GithubClient {
    client: Octocrab,
}

impl GithubClient {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RepositoryClient for GithubClient {
    /// Documentation: https://docs.github.com/en/rest/repos/contents#get-repository-content
    async fn fetch_file(&self, content_url: &str) -> anyhow::Result<String> {
        let content: Content = self
            .client
            .get(content_url, None::<&()>)
            .await
            .with_context(|| format!("Cannot load {content_url}"))?;
        content
            .decoded_content()
            .ok_or_else(|| anyhow::anyhow!("{content_url} is not a file"))
    }

    async fn post_status(&self, statuses_url: &str, status: &CommitStatus) -> anyhow::Result<()> {
        let _: serde_json::Value = self
            .client
            .post(statuses_url, Some(status))
            .await
            .with_context(|| format!("Cannot set status {} at {statuses_url}", status.state))?;
        Ok(())
    }

    async fn post_review(&self, review_url: &str, review: &Review) -> anyhow::Result<()> {
        let _: serde_json::Value = self
            .client
            .post(review_url, Some(review))
            .await
            .with_context(|| format!("Cannot post review to {review_url}"))?;
        Ok(())
    }

    async fn generate_release_notes(
        &self,
        repository_url: &str,
        request: &ReleaseNotesRequest,
    ) -> anyhow::Result<ReleaseNotes> {
        let url = format!(
            "{}/releases/generate-notes",
            repository_url.trim_end_matches('/')
        );
        self.client
            .post(&url, Some(request))
            .await
            .with_context(|| format!("Cannot generate release notes for {}", request.target_commitish))
    }

    async fn create_release(
        &self,
        releases_url: &str,
        release: &NewRelease,
    ) -> anyhow::Result<Release> {
        self.client
            .post(releases_url, Some(release))
            .await
            .with_context(|| format!("Cannot create release {}", release.tag_name))
    }
}
