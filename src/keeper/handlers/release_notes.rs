use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::github::{NewRelease, Review, ReleaseNotesRequest};
use crate::keeper::event::{PullRequestEvent, PushEvent};
use crate::keeper::{KeeperContext, RepositoryClient};
use crate::policy::Policy;
use crate::utils::logging::LogFailure;
use crate::utils::timing::run_bounded;

const RELEASE_NOTE_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Tag name used to generate notes for commits that were not released yet.
const PREVIEW_TAG_NAME: &str = "unreleased";

pub(crate) const PREVIEW_HEADER: &str = ":memo: Release notes preview";

/// Generates release notes for the head of a pull request and posts them as a review comment.
/// Runs again on every push to the pull request, each run posts a fresh preview.
pub(super) async fn release_notes_preview(client: Arc<dyn RepositoryClient>, event: PullRequestEvent) {
    if let Some(result) = run_bounded(
        "release notes preview",
        RELEASE_NOTE_TIMEOUT,
        post_preview(client.as_ref(), &event),
    )
    .await
    {
        result.log_failure("Cannot post release notes preview");
    }
}

async fn post_preview(client: &dyn RepositoryClient, event: &PullRequestEvent) -> anyhow::Result<()> {
    let request = ReleaseNotesRequest {
        tag_name: PREVIEW_TAG_NAME.to_string(),
        target_commitish: event.pull_request.head.sha.clone(),
    };
    let notes = client
        .generate_release_notes(&event.repository.url, &request)
        .await
        .context("Cannot generate release notes")?;
    tracing::debug!("Generated release notes: {notes:?}");

    let body = format!(
        "{PREVIEW_HEADER} (merging into `{}`)\n\n{}",
        event.base_branch(),
        notes.body
    );
    client
        .post_review(&event.review_url(), &Review::comment(body))
        .await
        .context("Cannot post review comment")?;
    Ok(())
}

/// Publishes a release with generated notes for a pushed tag and announces it in chat.
/// Delivering the same tag twice makes a second attempt, which GitHub rejects.
pub(super) async fn publish_tag_release(
    ctx: Arc<KeeperContext>,
    event: PushEvent,
    tag: String,
    policy: Arc<Policy>,
) {
    if let Some(result) = run_bounded(
        "publish tag release",
        RELEASE_NOTE_TIMEOUT,
        publish_release(&ctx, &event, &tag, &policy),
    )
    .await
    {
        result.log_failure("Cannot publish release");
    }
}

async fn publish_release(
    ctx: &KeeperContext,
    event: &PushEvent,
    tag: &str,
    policy: &Policy,
) -> anyhow::Result<()> {
    let release = NewRelease {
        tag_name: tag.to_string(),
        name: tag.to_string(),
        draft: policy.release_note.draft,
        generate_release_notes: true,
    };
    let release = ctx
        .client
        .create_release(&event.repository.releases_url(), &release)
        .await
        .with_context(|| format!("Cannot create release for tag {tag}"))?;
    tracing::info!("Published release {}", release.html_url);

    if let Some(notifier) = ctx.notifier.as_ref().filter(|_| policy.release_note.notify) {
        let message = format!(
            "Released {} {tag}: {}",
            event.repository.full_name, release.html_url
        );
        notifier
            .notify(&message)
            .await
            .log_failure("Cannot send release notification");
    }
    Ok(())
}
