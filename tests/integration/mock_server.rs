//! Mock HTTP server setup for integration tests

use mail_api_route::auth::StaticCredentialProvider;
use mail_api_route::{AuthCredential, HttpTransport, RetryPolicy, TransportConfig};
use mockito::{Mock, Server, ServerGuard};
use std::sync::Arc;

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    pub fn config(&self) -> TransportConfig {
        TransportConfig::new(&self.base_url).with_app_version("ios-mail@4.2.0")
    }

    /// Transport with no retries and no credential provider.
    pub fn transport(&self) -> HttpTransport {
        HttpTransport::new(self.config()).expect("transport")
    }

    /// Transport that retries quickly and resolves `uid-1` / `token-1`.
    pub fn retrying_transport(&self, max_retries: u32) -> HttpTransport {
        HttpTransport::new(self.config().with_retry(RetryPolicy::new(max_retries, 1, 5)))
            .expect("transport")
            .with_credentials(Arc::new(StaticCredentialProvider::new(credential())))
    }

    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}

pub fn credential() -> AuthCredential {
    AuthCredential::new("uid-1", "token-1")
}
