use std::time::Duration;

use anyhow::Context;
use axum::async_trait;

const SLACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends short human readable messages to a chat channel.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    async fn notify(&self, message: &str) -> anyhow::Result<()>;
}

/// Posts messages to a Slack incoming webhook.
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }
}

#[derive(serde::Serialize)]
struct SlackMessage<'a> {
    text: &'a str,
}

#[async_trait]
impl ChatNotifier for SlackNotifier {
    async fn notify(&self, message: &str) -> anyhow::Result<()> {
        self.client
            .post(&self.webhook_url)
            .timeout(SLACK_TIMEOUT)
            .json(&SlackMessage { text: message })
            .send()
            .await
            .context("Cannot send Slack message")?
            .error_for_status()
            .context("Slack rejected message")?;
        Ok(())
    }
}
