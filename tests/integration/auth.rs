//! Credential resolution at dispatch time.

use crate::integration::mock_server::MockServerFixture;
use mail_api_route::auth::StaticCredentialProvider;
use mail_api_route::{AuthCredential, Error, RequestDescriptor};
use mockito::Matcher;
use std::sync::Arc;

#[tokio::test]
async fn test_missing_credential_sends_nothing() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/core/v4/users")
        .expect(0)
        .create_async()
        .await;

    let err = fixture
        .transport()
        .dispatch(&RequestDescriptor::new("/core/v4/users"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingCredential { ref path } if path == "/core/v4/users"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthenticated_request_omits_auth_headers() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/core/v4/auth/info")
        .match_header("authorization", Matcher::Missing)
        .match_header("x-session-id", Matcher::Missing)
        .with_status(200)
        .create_async()
        .await;

    let d = RequestDescriptor::new("/core/v4/auth/info").with_authenticated(false);
    fixture.transport().dispatch(&d).await.expect("dispatch");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_provider_fills_in_missing_credential() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/core/v4/users")
        .match_header("authorization", "Bearer provided")
        .match_header("x-session-id", "uid-9")
        .with_status(200)
        .create_async()
        .await;

    let transport = fixture
        .transport()
        .with_credentials(Arc::new(StaticCredentialProvider::new(AuthCredential::new(
            "uid-9", "provided",
        ))));
    transport
        .dispatch(&RequestDescriptor::new("/core/v4/users"))
        .await
        .expect("dispatch");
    mock.assert_async().await;
}
