//! Retry behaviour gated by `auto_retry` and the transport's retry policy.

use crate::integration::mock_server::MockServerFixture;
use mail_api_route::auth::StaticCredentialProvider;
use mail_api_route::{Error, HttpTransport, RequestDescriptor, RetryPolicy, TransportConfig};
use std::sync::Arc;

#[tokio::test]
async fn test_retry_on_transient_error() {
    let mut fixture = MockServerFixture::new().await;
    let failing = fixture
        .server
        .mock("GET", "/mail/v4/messages")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;
    let ok = fixture
        .server
        .mock("GET", "/mail/v4/messages")
        .with_status(200)
        .with_body(r#"{"Code":1000}"#)
        .expect(1)
        .create_async()
        .await;

    let resp = fixture
        .retrying_transport(2)
        .dispatch(&RequestDescriptor::new("/mail/v4/messages"))
        .await
        .expect("second attempt should succeed");

    assert_eq!(resp.status, 200);
    assert_eq!(resp.retry_count, 1);
    failing.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_auto_retry_false_fails_on_first_error() {
    let mut fixture = MockServerFixture::new().await;
    let failing = fixture
        .server
        .mock("POST", "/mail/v4/messages/send")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;
    let ok = fixture
        .server
        .mock("POST", "/mail/v4/messages/send")
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let d = RequestDescriptor::new("/mail/v4/messages/send")
        .with_method(mail_api_route::HttpMethod::Post)
        .with_auto_retry(false);
    let err = fixture.retrying_transport(3).dispatch(&d).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(err.is_retryable());
    failing.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_client_error_is_never_retried() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/core/v4/users")
        .with_status(400)
        .expect(1)
        .create_async()
        .await;

    let err = fixture
        .retrying_transport(3)
        .dispatch(&RequestDescriptor::new("/core/v4/users"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_retry_budget_is_exhausted() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/core/v4/events/latest")
        .with_status(429)
        .with_header("retry-after", "0")
        .expect(3)
        .create_async()
        .await;

    let err = fixture
        .retrying_transport(2)
        .dispatch(&RequestDescriptor::new("/core/v4/events/latest"))
        .await
        .unwrap_err();

    match err {
        Error::Remote {
            status,
            retry_after_ms,
            ..
        } => {
            assert_eq!(status, 429);
            assert_eq!(retry_after_ms, Some(0));
        }
        other => panic!("expected remote error, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_failure_is_retried_then_surfaced() {
    // Nothing listens on port 1.
    let config = TransportConfig::new("http://127.0.0.1:1").with_retry(RetryPolicy::new(1, 1, 1));
    let transport = HttpTransport::new(config)
        .unwrap()
        .with_credentials(Arc::new(StaticCredentialProvider::new(
            crate::integration::mock_server::credential(),
        )));

    let err = transport
        .dispatch(&RequestDescriptor::new("/core/v4/users"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "{:?}", err);
}
