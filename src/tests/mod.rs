pub mod mocks;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use tower::Service;

use crate::github::server::{create_app, ServerState};
use crate::github::WebhookSecret;
use crate::keeper::KeeperContext;
use crate::tests::mocks::MockRepositoryClient;

// Public re-exports for use in tests
pub use io::load_test_file;
pub use webhook::{
    create_webhook_request, sign_body, webhook_request, TEST_PATH_PREFIX, TEST_WEBHOOK_SECRET,
};

/// Sends requests to the full HTTP application, backed by a mocked repository client.
pub struct KeeperTester {
    app: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl KeeperTester {
    pub fn new(client: MockRepositoryClient) -> Self {
        let ctx = Arc::new(KeeperContext::new(Arc::new(client), None));
        let state = ServerState::new(WebhookSecret::new(TEST_WEBHOOK_SECRET.to_string()), ctx);
        Self {
            app: create_app(state, TEST_PATH_PREFIX),
        }
    }

    /// Sends a correctly signed webhook.
    pub async fn send_webhook(&mut self, event: &str, body: &str) -> TestResponse {
        self.send(create_webhook_request(event, body)).await
    }

    pub async fn send_raw(
        &mut self,
        event: &str,
        body: &str,
        signature: Option<&str>,
    ) -> TestResponse {
        self.send(webhook_request(event, body, signature)).await
    }

    pub async fn request(&mut self, method: Method, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.call(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 10 * 1024 * 1024)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        tracing::debug!("Received response with status {status} and body `{body}`");
        TestResponse {
            status,
            headers,
            body,
        }
    }
}
