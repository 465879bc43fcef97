use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;

use crate::github::webhook::{GitHubWebhook, WebhookSecret};
use crate::keeper::{handle_webhook_event, KeeperContext};

const ACCEPTED_BODY: &str = "Accepted";

/// Shared server state for all axum handlers.
pub struct ServerState {
    webhook_secret: WebhookSecret,
    ctx: Arc<KeeperContext>,
}

impl ServerState {
    pub fn new(webhook_secret: WebhookSecret, ctx: Arc<KeeperContext>) -> Self {
        Self {
            webhook_secret,
            ctx,
        }
    }

    pub fn get_webhook_secret(&self) -> &WebhookSecret {
        &self.webhook_secret
    }
}

pub type ServerStateRef = Arc<ServerState>;

/// Builds the HTTP application. Webhooks are accepted with `POST /<path_prefix>`.
pub fn create_app(state: ServerState, path_prefix: &str) -> Router {
    Router::new()
        .route(
            &format!("/{}", path_prefix.trim_matches('/')),
            post(github_webhook_handler),
        )
        .layer(ConcurrencyLimitLayer::new(100))
        .with_state(Arc::new(state))
}

/// Axum handler that receives a verified webhook and starts the jobs it triggers.
/// The response is sent once the jobs are spawned, without waiting for them.
pub async fn github_webhook_handler(
    State(state): State<ServerStateRef>,
    GitHubWebhook(event): GitHubWebhook,
) -> impl IntoResponse {
    handle_webhook_event(Arc::clone(&state.ctx), event).await;
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain".to_string()),
            (header::CONTENT_LENGTH, ACCEPTED_BODY.len().to_string()),
        ],
        ACCEPTED_BODY,
    )
}
