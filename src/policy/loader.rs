use std::sync::Arc;

use crate::keeper::RepositoryClient;
use crate::policy::{default_policy, Policy, SUPPORTED_POLICY_VERSION};

#[derive(thiserror::Error, Debug)]
pub enum PolicyLoadError {
    #[error("Cannot fetch policy document: {0:?}")]
    Fetch(anyhow::Error),
    #[error("Cannot parse policy document: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(
        "Policy version {0} is not supported, newest supported is {supported}",
        supported = SUPPORTED_POLICY_VERSION
    )]
    UnsupportedVersion(u32),
}

/// Downloads and parses the policy document located at `content_url`.
pub async fn fetch_policy(
    client: &dyn RepositoryClient,
    content_url: &str,
) -> Result<Policy, PolicyLoadError> {
    let text = client
        .fetch_file(content_url)
        .await
        .map_err(PolicyLoadError::Fetch)?;
    let policy = Policy::parse(&text)?;
    if policy.version > SUPPORTED_POLICY_VERSION {
        return Err(PolicyLoadError::UnsupportedVersion(policy.version));
    }
    Ok(policy)
}

/// Loads the policy for a single event.
/// Any failure falls back to the default policy, so that a broken policy document
/// never blocks webhook processing.
pub async fn load_policy(client: &dyn RepositoryClient, content_url: &str) -> Arc<Policy> {
    match fetch_policy(client, content_url).await {
        Ok(policy) => {
            tracing::debug!("Loaded policy from {content_url}: {policy:?}");
            Arc::new(policy)
        }
        Err(error @ PolicyLoadError::Fetch(_)) => {
            tracing::info!("Using default policy, {content_url} is unavailable: {error}");
            default_policy()
        }
        Err(error @ (PolicyLoadError::Parse(_) | PolicyLoadError::UnsupportedVersion(_))) => {
            tracing::warn!("Using default policy, {content_url} cannot be used: {error}");
            default_policy()
        }
    }
}
