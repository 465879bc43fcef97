use axum::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::github::server::ServerStateRef;
use crate::keeper::event::WebhookEvent;

pub const EVENT_HEADER: &str = "x-github-event";
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// GitHub refuses to deliver payloads larger than 25 MB.
const MAX_WEBHOOK_BODY_SIZE: usize = 25 * 1024 * 1024;

#[derive(thiserror::Error, Debug)]
pub enum WebhookError {
    #[error("Signature unmatched")]
    SignatureMismatch,
    #[error("Cannot read webhook body: {0}")]
    Body(String),
    #[error("Failed to decode github webhook body to JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("We don't support event of '{0}'")]
    UnsupportedEvent(String),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match self {
            WebhookError::SignatureMismatch | WebhookError::Body(_) | WebhookError::Decode(_) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::UnsupportedEvent(_) => StatusCode::FORBIDDEN,
        };
        (status, self.to_string()).into_response()
    }
}

/// axum extractor for GitHub webhook events.
#[derive(Debug)]
pub struct GitHubWebhook(pub WebhookEvent);

/// Extracts a webhook event from a HTTP request.
#[async_trait]
impl FromRequest<ServerStateRef> for GitHubWebhook {
    type Rejection = WebhookError;

    async fn from_request(request: Request, state: &ServerStateRef) -> Result<Self, Self::Rejection> {
        // Verify that the request is valid before looking at its content
        let (verified, request) = verify_and_rewind(request, state.get_webhook_secret()).await;
        if !verified {
            tracing::error!("Webhook request failed, could not authenticate webhook");
            return Err(WebhookError::SignatureMismatch);
        }

        let kind = request
            .headers()
            .get(EVENT_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = axum::body::to_bytes(request.into_body(), MAX_WEBHOOK_BODY_SIZE)
            .await
            .map_err(|error| WebhookError::Body(error.to_string()))?;

        match WebhookEvent::decode(&kind, &body) {
            Ok(event) => Ok(GitHubWebhook(event)),
            Err(error) => {
                tracing::error!("Cannot parse webhook event: {error:?}");
                Err(error)
            }
        }
    }
}

/// Drains the request body, checks its signature and puts the identical bytes back into
/// the request, so that later stages can read the body from the start.
///
/// The body is rewound whatever its size. `MAX_WEBHOOK_BODY_SIZE` is only enforced
/// when the event is decoded.
pub async fn verify_and_rewind(request: Request, secret: &WebhookSecret) -> (bool, Request) {
    let (parts, body) = request.into_parts();
    let body: Bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("Parsing webhook body failed: {error:?}");
            return (false, Request::from_parts(parts, Body::empty()));
        }
    };

    let verified = verify_gh_signature(&parts.headers, &body, secret);
    (verified, Request::from_parts(parts, Body::from(body)))
}

type HmacSha256 = Hmac<Sha256>;

/// Verifies that the request is properly signed by GitHub with SHA-256 and the passed `secret`.
/// The header must be exactly `sha256=` followed by the lowercase hex digest.
/// The digest comparison is constant-time.
pub fn verify_gh_signature(headers: &HeaderMap, body: &[u8], secret: &WebhookSecret) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Some(signature) = headers.get(SIGNATURE_HEADER).map(|v| v.as_bytes()) else {
        return false;
    };
    let Some(signature) = signature
        .strip_prefix(b"sha256=")
        .filter(|digest| digest.iter().all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(c)))
        .and_then(|digest| hex::decode(digest).ok())
    else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.expose().as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

/// Wrapper for a secret which is zeroed on drop and can be exposed only through the [`WebhookSecret::expose`] method.
pub struct WebhookSecret(SecretString);

impl WebhookSecret {
    pub fn new(secret: String) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret().as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}
