//! This is the library of the doorkeeper webhook service.
pub mod github;
pub mod keeper;
pub mod policy;
pub mod utils;

pub use github::api::{create_github_client, GithubClient};
pub use github::server::{create_app, ServerState};
pub use github::WebhookSecret;
pub use keeper::{KeeperContext, SlackNotifier};

#[cfg(test)]
mod tests;
