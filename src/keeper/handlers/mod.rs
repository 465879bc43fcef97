use std::sync::Arc;

use tracing::Instrument;

use crate::keeper::event::{PullRequestAction, PullRequestEvent, PushEvent, WebhookEvent};
use crate::keeper::handlers::release_notes::{publish_tag_release, release_notes_preview};
use crate::keeper::handlers::validate::validate_pull_request;
use crate::keeper::KeeperContext;
use crate::policy::{load_policy, Policy};

mod release_notes;
mod validate;

/// A unit of post-processing work started by a webhook event.
#[derive(Debug, Clone)]
pub enum Job {
    /// Validate the title and description of a pull request.
    ValidatePullRequest(PullRequestEvent),
    /// Post a release note preview to a pull request.
    ReleaseNotesPreview(PullRequestEvent),
    /// Publish a release for a pushed tag.
    PublishTagRelease { event: PushEvent, tag: String },
}

/// Work that a pull request action may start, if the policy allows it.
#[derive(Debug, Clone, Copy)]
enum Trigger {
    Validation,
    ReleaseNote,
}

fn pull_request_triggers(action: &PullRequestAction) -> &'static [Trigger] {
    match action {
        PullRequestAction::Opened => &[Trigger::Validation, Trigger::ReleaseNote],
        PullRequestAction::Edited => &[Trigger::Validation],
        PullRequestAction::Synchronize => &[Trigger::ReleaseNote],
        PullRequestAction::Other => &[],
    }
}

/// Decides which jobs should run for the given event under the given policy.
pub fn plan_jobs(event: &WebhookEvent, policy: &Policy) -> Vec<Job> {
    match event {
        WebhookEvent::Ping => vec![],
        WebhookEvent::PullRequest(event) => pull_request_triggers(&event.action)
            .iter()
            .filter_map(|trigger| match trigger {
                Trigger::Validation if policy.validates(event.base_branch()) => {
                    Some(Job::ValidatePullRequest(event.clone()))
                }
                Trigger::ReleaseNote if policy.release_notes_for_branch(event.base_branch()) => {
                    Some(Job::ReleaseNotesPreview(event.clone()))
                }
                _ => None,
            })
            .collect(),
        WebhookEvent::Push(event) => match event.tag_name() {
            Some(tag) if policy.release_notes_for_tag(tag) => vec![Job::PublishTagRelease {
                event: event.clone(),
                tag: tag.to_string(),
            }],
            _ => vec![],
        },
    }
}

/// Loads the policy for the event and starts all jobs that it allows.
///
/// Jobs run in detached tasks. This function never waits for them, so the webhook
/// is acknowledged before any job finishes, and job failures never reach the caller.
pub async fn handle_webhook_event(ctx: Arc<KeeperContext>, event: WebhookEvent) {
    let policy_url = match &event {
        WebhookEvent::Ping => {
            tracing::info!("Received ping");
            return;
        }
        WebhookEvent::PullRequest(event) => event.policy_url(),
        WebhookEvent::Push(event) => event.policy_url(),
    };
    let policy = load_policy(ctx.client.as_ref(), &policy_url).await;

    let jobs = plan_jobs(&event, &policy);
    tracing::debug!("Planned jobs for {:?} event: {jobs:?}", event.kind());
    for job in jobs {
        spawn_job(Arc::clone(&ctx), job, Arc::clone(&policy));
    }
}

fn spawn_job(ctx: Arc<KeeperContext>, job: Job, policy: Arc<Policy>) {
    // Detached: nothing joins or cancels the task once it is spawned.
    let _ = match job {
        Job::ValidatePullRequest(event) => {
            let span = tracing::info_span!("ValidatePullRequest", pr = event.to_string());
            tokio::spawn(
                validate_pull_request(Arc::clone(&ctx.client), event, policy).instrument(span),
            )
        }
        Job::ReleaseNotesPreview(event) => {
            let span = tracing::info_span!("ReleaseNotesPreview", pr = event.to_string());
            tokio::spawn(release_notes_preview(Arc::clone(&ctx.client), event).instrument(span))
        }
        Job::PublishTagRelease { event, tag } => {
            let span = tracing::info_span!(
                "PublishTagRelease",
                repo = event.repository.full_name,
                tag = tag
            );
            tokio::spawn(publish_tag_release(ctx, event, tag, policy).instrument(span))
        }
    };
}
