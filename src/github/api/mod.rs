use anyhow::Context;
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};

pub mod client;

pub use client::GithubClient;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Creates an octocrab client authenticated with a (personal or installation) access token.
pub fn create_github_client(token: SecretString, github_url: &str) -> anyhow::Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token.expose_secret().clone())
        .base_uri(github_url)
        .context("Invalid GitHub API URL")?
        .build()
        .context("Could not create octocrab builder")
}
