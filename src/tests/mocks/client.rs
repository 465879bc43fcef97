use std::time::Duration;

use axum::async_trait;
use tokio::sync::mpsc;

use crate::github::{
    CommitStatus, NewRelease, Release, ReleaseNotes, ReleaseNotesRequest, Review, StatusState,
};
use crate::keeper::RepositoryClient;

/// A request received by [`MockRepositoryClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchFile { url: String },
    Status { url: String, status: CommitStatus },
    Review { url: String, review: Review },
    GenerateNotes { url: String, request: ReleaseNotesRequest },
    CreateRelease { url: String, release: NewRelease },
}

impl ApiCall {
    fn kind(&self) -> CallKind {
        match self {
            ApiCall::FetchFile { .. } => CallKind::FetchFile,
            ApiCall::Status { status, .. } => CallKind::Status(status.state),
            ApiCall::Review { .. } => CallKind::Review,
            ApiCall::GenerateNotes { .. } => CallKind::GenerateNotes,
            ApiCall::CreateRelease { .. } => CallKind::CreateRelease,
        }
    }
}

/// Selects calls which should fail or never finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    FetchFile,
    Status(StatusState),
    Review,
    GenerateNotes,
    CreateRelease,
}

/// Calls recorded by a [`MockRepositoryClient`], in the order in which they were made.
pub struct ApiCalls {
    rx: mpsc::UnboundedReceiver<ApiCall>,
}

impl ApiCalls {
    /// Returns all calls made so far.
    pub fn drain(&mut self) -> Vec<ApiCall> {
        std::iter::from_fn(|| self.rx.try_recv().ok()).collect()
    }

    /// Waits for the next call, which may be made by a detached task.
    pub async fn next(&mut self) -> ApiCall {
        tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("Timed out while waiting for an API call")
            .expect("Repository client was dropped")
    }
}

/// Repository client which records every call and answers with canned data.
pub struct MockRepositoryClient {
    tx: mpsc::UnboundedSender<ApiCall>,
    policy: Option<String>,
    failing: Vec<CallKind>,
    hanging: Vec<CallKind>,
}

impl MockRepositoryClient {
    /// The repository contains a policy file with the given content.
    pub fn with_policy(policy: &str) -> (Self, ApiCalls) {
        Self::create(Some(policy.to_string()))
    }

    /// The repository has no policy file.
    pub fn without_policy() -> (Self, ApiCalls) {
        Self::create(None)
    }

    fn create(policy: Option<String>) -> (Self, ApiCalls) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Self {
            tx,
            policy,
            failing: vec![],
            hanging: vec![],
        };
        (client, ApiCalls { rx })
    }

    pub fn fail_on(mut self, kind: CallKind) -> Self {
        self.failing.push(kind);
        self
    }

    pub fn hang_on(mut self, kind: CallKind) -> Self {
        self.hanging.push(kind);
        self
    }

    async fn record(&self, call: ApiCall) -> anyhow::Result<()> {
        let kind = call.kind();
        // The receiver may already be gone when a test ignores the calls.
        let _ = self.tx.send(call);
        if self.hanging.contains(&kind) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(&kind) {
            anyhow::bail!("Mocked failure of {kind:?}");
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryClient for MockRepositoryClient {
    async fn fetch_file(&self, content_url: &str) -> anyhow::Result<String> {
        self.record(ApiCall::FetchFile {
            url: content_url.to_string(),
        })
        .await?;
        self.policy
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Not Found: {content_url}"))
    }

    async fn post_status(&self, statuses_url: &str, status: &CommitStatus) -> anyhow::Result<()> {
        self.record(ApiCall::Status {
            url: statuses_url.to_string(),
            status: status.clone(),
        })
        .await
    }

    async fn post_review(&self, review_url: &str, review: &Review) -> anyhow::Result<()> {
        self.record(ApiCall::Review {
            url: review_url.to_string(),
            review: review.clone(),
        })
        .await
    }

    async fn generate_release_notes(
        &self,
        repository_url: &str,
        request: &ReleaseNotesRequest,
    ) -> anyhow::Result<ReleaseNotes> {
        self.record(ApiCall::GenerateNotes {
            url: repository_url.to_string(),
            request: request.clone(),
        })
        .await?;
        Ok(ReleaseNotes {
            body: "## What's Changed\n* Add release automation by @octocat in #7".to_string(),
        })
    }

    async fn create_release(
        &self,
        releases_url: &str,
        release: &NewRelease,
    ) -> anyhow::Result<Release> {
        self.record(ApiCall::CreateRelease {
            url: releases_url.to_string(),
            release: release.clone(),
        })
        .await?;
        let html_url = format!(
            "{}/tag/{}",
            releases_url.replace("https://api.github.com/repos/", "https://github.com/"),
            release.tag_name
        );
        Ok(Release { html_url })
    }
}
