//! Descriptor fields as they appear on the wire.

use crate::integration::mock_server::{credential, MockServerFixture};
use mail_api_route::route::{HasParameters, HasRequestMetadata, HttpMethod, Parameters};
use mail_api_route::{Error, RequestDescriptor};
use mockito::Matcher;
use serde_json::json;

struct ListMessages {
    page: u32,
    label: &'static str,
}

impl HasParameters for ListMessages {
    fn parameters(&self) -> Option<Parameters> {
        json!({"Page": self.page, "LabelID": self.label}).as_object().cloned()
    }
}

impl HasRequestMetadata for ListMessages {
    fn path(&self) -> String {
        "/mail/v4/messages".to_string()
    }

    fn auth_credential(&self) -> Option<mail_api_route::AuthCredential> {
        Some(credential())
    }
}

#[tokio::test]
async fn test_get_sends_query_version_and_auth_headers() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/mail/v4/messages")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("Page".into(), "2".into()),
            Matcher::UrlEncoded("LabelID".into(), "inbox".into()),
        ]))
        .match_header("x-api-version", "3")
        .match_header("x-app-version", "ios-mail@4.2.0")
        .match_header("authorization", "Bearer token-1")
        .match_header("x-session-id", "uid-1")
        .match_header("x-request-id", Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"Code":1000,"Messages":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let resp = fixture
        .transport()
        .dispatch(&ListMessages {
            page: 2,
            label: "inbox",
        })
        .await
        .expect("dispatch");

    assert_eq!(resp.status, 200);
    assert_eq!(resp.retry_count, 0);
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["Code"], 1000);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_post_sends_json_body_and_overridden_headers() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/core/v4/labels")
        .match_header("content-type", "application/json")
        .match_header("x-api-version", "4")
        .match_header("x-app-version", "ios-mail@5.0.0")
        .match_body(Matcher::Json(json!({"Name": "Receipts", "Color": "#7272a7"})))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let d = RequestDescriptor::new("/core/v4/labels")
        .with_method(HttpMethod::Post)
        .with_version(4)
        .with_header("x-app-version", "ios-mail@5.0.0")
        .with_parameters(
            json!({"Name": "Receipts", "Color": "#7272a7"})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .with_credential(credential());

    fixture.transport().dispatch(&d).await.expect("dispatch");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_and_put_use_their_verbs() {
    let mut fixture = MockServerFixture::new().await;
    let delete = fixture
        .server
        .mock("DELETE", "/core/v4/labels/42")
        .with_status(200)
        .create_async()
        .await;
    let put = fixture
        .server
        .mock("PUT", "/core/v4/labels/42")
        .with_status(200)
        .create_async()
        .await;

    let transport = fixture.transport();
    let base = RequestDescriptor::new("/core/v4/labels/42").with_credential(credential());
    transport
        .dispatch(&base.clone().with_method(HttpMethod::Delete))
        .await
        .expect("delete");
    transport
        .dispatch(&base.with_method(HttpMethod::Put))
        .await
        .expect("put");

    delete.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn test_remote_error_is_classified() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("GET", "/core/v4/users", 404, r#"{"Code":2501,"Error":"User not found"}"#)
        .await;

    let d = RequestDescriptor::new("/core/v4/users").with_credential(credential());
    let err = fixture.transport().dispatch(&d).await.unwrap_err();
    match err {
        Error::Remote {
            status,
            code,
            message,
            retryable,
            ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(code.name(), "not_found");
            assert!(message.contains("User not found"));
            assert!(!retryable);
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_path_never_reaches_the_network() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let transport = fixture.transport();
    for path in ["", "users", "/with space", "http://other.example/x"] {
        let d = RequestDescriptor::new(path).with_credential(credential());
        let err = transport.dispatch(&d).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }), "{:?}", path);
    }
    mock.assert_async().await;
}
