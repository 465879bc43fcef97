use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use doorkeeper::github::api::DEFAULT_GITHUB_API_URL;
use doorkeeper::keeper::ChatNotifier;
use doorkeeper::{
    create_app, create_github_client, GithubClient, KeeperContext, ServerState, SlackNotifier,
    WebhookSecret,
};

#[derive(clap::Parser)]
struct Opts {
    /// Secret used to authenticate webhooks.
    /// If it is empty, every webhook is rejected.
    #[arg(long, env = "WEBHOOK_SECRET", default_value = "")]
    webhook_secret: String,

    /// Access token used to call the GitHub API.
    #[arg(long, env = "GITHUB_TOKEN")]
    github_token: String,

    /// Base URL of the GitHub API.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
    github_api_url: String,

    /// Path on which webhooks are received.
    #[arg(long, env = "DOORKEEPER_PATH_PREFIX", default_value = "webhook")]
    path_prefix: String,

    /// Address of the HTTP server.
    #[arg(long, env = "DOORKEEPER_BIND", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Slack incoming webhook used to announce published releases.
    #[arg(long, env = "SLACK_WEBHOOK_URL")]
    slack_webhook_url: Option<String>,
}

async fn server(opts: Opts) -> anyhow::Result<()> {
    let octocrab = create_github_client(opts.github_token.into(), &opts.github_api_url)?;
    let notifier = opts
        .slack_webhook_url
        .map(|url| Arc::new(SlackNotifier::new(url)) as Arc<dyn ChatNotifier>);
    if notifier.is_none() {
        tracing::info!("No Slack webhook configured, release notifications are disabled");
    }

    let ctx = KeeperContext::new(Arc::new(GithubClient::new(octocrab)), notifier);
    let webhook_secret = WebhookSecret::new(opts.webhook_secret);
    if webhook_secret.is_empty() {
        tracing::warn!("Webhook secret is empty, all webhooks will be rejected");
    }
    let state = ServerState::new(webhook_secret, Arc::new(ctx));
    let app = create_app(state, &opts.path_prefix);

    let listener = tokio::net::TcpListener::bind(opts.bind)
        .await
        .with_context(|| format!("Cannot bind to {}", opts.bind))?;
    tracing::info!(
        "Listening on {} for webhooks at /{}",
        opts.bind,
        opts.path_prefix.trim_matches('/')
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn try_main(opts: Opts) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot build tokio runtime")?;

    runtime.block_on(async move {
        let result = server(opts).await;
        tracing::warn!("Server has ended: {result:?}");
        result
    })
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let opts = Opts::parse();
    if let Err(error) = try_main(opts) {
        eprintln!("Error: {error:?}");
        std::process::exit(1);
    }
}
