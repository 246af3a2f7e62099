/// Integration tests for the FCM client against stubbed Google endpoints
///
/// This test module covers:
/// - Service account JWT exchange at the token endpoint
/// - Request shape sent to messages:send
/// - Success / provider failure / parse / transport classification
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use notes_fcm_shared::{
    AccessToken, AuthError, FcmClient, FcmError, OutboundMessage, ServiceAccountKey,
    ServiceAccountTokenProvider, TokenProvider,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEND_PATH: &str = "/v1/projects/notes-test/messages:send";

fn fixture_key() -> ServiceAccountKey {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/service-account.json");
    ServiceAccountKey::from_file(path).expect("fixture service account")
}

fn fixture_key_with_token_uri(token_uri: String) -> ServiceAccountKey {
    let mut key = fixture_key();
    key.token_uri = token_uri;
    key
}

/// Hands out a fixed token and counts how often it was asked
struct StaticTokenProvider {
    token: String,
    calls: AtomicUsize,
}

impl StaticTokenProvider {
    fn new(token: &str) -> Arc<Self> {
        Arc::new(Self {
            token: token.to_string(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_access_token(
        &self,
        _credentials: &ServiceAccountKey,
    ) -> Result<AccessToken, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AccessToken::new(
            self.token.clone(),
            Utc::now() + Duration::hours(1),
        ))
    }
}

fn stub_client(server: &MockServer, provider: Arc<StaticTokenProvider>) -> FcmClient {
    FcmClient::new(fixture_key())
        .with_api_base(server.uri())
        .with_token_provider(provider)
}

#[tokio::test]
async fn test_token_exchange_returns_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.c.test-access-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let key = fixture_key_with_token_uri(format!("{}/token", server.uri()));
    let token = ServiceAccountTokenProvider::new()
        .get_access_token(&key)
        .await
        .unwrap();

    assert!(!token.as_str().is_empty());
    assert_eq!(token.as_str(), "ya29.c.test-access-token");
    assert!(token.expires_at() > Utc::now());
}

#[tokio::test]
async fn test_token_exchange_rejection_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(&server)
        .await;

    let key = fixture_key_with_token_uri(format!("{}/token", server.uri()));
    let err = ServiceAccountTokenProvider::new()
        .get_access_token(&key)
        .await
        .unwrap_err();

    match err {
        AuthError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

async fn exchange_with_expires_in(expires_in: i64) -> Result<AccessToken, AuthError> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.x",
            "expires_in": expires_in,
            "token_type": "Bearer"
        })))
        .mount(&server)
        .await;

    let key = fixture_key_with_token_uri(format!("{}/token", server.uri()));
    ServiceAccountTokenProvider::new().get_access_token(&key).await
}

#[tokio::test]
async fn test_token_exchange_rejects_out_of_range_expiry() {
    let err = exchange_with_expires_in(10_000_000_000_000).await.unwrap_err();
    assert!(matches!(err, AuthError::ResponseParse(ref msg) if msg.contains("out of range")));

    let err = exchange_with_expires_in(i64::MAX).await.unwrap_err();
    assert!(matches!(err, AuthError::ResponseParse(_)));
}

#[tokio::test]
async fn test_token_exchange_rejects_negative_expiry() {
    let err = exchange_with_expires_in(-60).await.unwrap_err();
    assert!(matches!(err, AuthError::ResponseParse(_)));
}

#[tokio::test]
async fn test_send_to_device_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.end-to-end",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(header("authorization", "Bearer ya29.end-to-end"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "message": {
                "token": "device-abc",
                "notification": {"title": "Hello", "body": "World"},
                "data": {}
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": "projects/notes-test/messages/0:1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let key = fixture_key_with_token_uri(format!("{}/token", server.uri()));
    let client = FcmClient::new(key).with_api_base(server.uri());

    let sent = client
        .send_to_device("device-abc", "Hello", "World", None)
        .await
        .unwrap();
    assert_eq!(sent.name(), Some("projects/notes-test/messages/0:1"));
}

#[tokio::test]
async fn test_send_success_returns_message_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "msg123"})))
        .mount(&server)
        .await;

    let client = stub_client(&server, StaticTokenProvider::new("test-token"));
    let token = client.get_access_token().await.unwrap();
    let message = OutboundMessage::to_device("device-abc", "Hi", "There");

    let sent = client.send_message(&token, &message).await.unwrap();
    assert_eq!(sent.name(), Some("msg123"));
}

#[tokio::test]
async fn test_send_to_topic_carries_only_topic_selector() {
    let server = MockServer::start().await;
    let mut data = HashMap::new();
    data.insert("route".to_string(), "/notes/42".to_string());

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(body_partial_json(json!({
            "message": {"topic": "news", "data": {"route": "/notes/42"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "msg-topic"})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = StaticTokenProvider::new("test-token");
    let client = stub_client(&server, provider.clone());
    client
        .send_to_topic("/topics/news", "Daily", "Digest", Some(data))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["message"].get("token").is_none());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_each_send_acquires_a_new_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "msg"})))
        .expect(2)
        .mount(&server)
        .await;

    let provider = StaticTokenProvider::new("test-token");
    let client = stub_client(&server, provider.clone());
    client.send_to_device("device-abc", "1", "1", None).await.unwrap();
    client.send_to_device("device-abc", "2", "2", None).await.unwrap();

    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_provider_error_body_is_returned_unmodified() {
    let server = MockServer::start().await;
    let error_body = json!({
        "error": {
            "code": 403,
            "message": "SenderId mismatch",
            "status": "PERMISSION_DENIED",
            "details": [{
                "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                "errorCode": "SENDER_ID_MISMATCH"
            }]
        }
    });
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(error_body.clone()))
        .mount(&server)
        .await;

    let client = stub_client(&server, StaticTokenProvider::new("test-token"));
    let err = client
        .send_to_device("device-abc", "Hi", "There", None)
        .await
        .unwrap_err();

    let failure = err.provider_failure().expect("provider failure");
    assert_eq!(failure.status, 403);
    assert_eq!(failure.body, error_body);
    assert_eq!(failure.error_status(), Some("PERMISSION_DENIED"));
}

#[tokio::test]
async fn test_dispatch_reports_failure_without_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": {"code": 404, "status": "NOT_FOUND"}})),
        )
        .mount(&server)
        .await;

    let client = stub_client(&server, StaticTokenProvider::new("test-token"));
    let token = client.get_access_token().await.unwrap();
    let result = client
        .dispatch(&token, &OutboundMessage::to_device("gone", "t", "b"))
        .await
        .unwrap();

    assert!(!result.is_success());
}

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = stub_client(&server, StaticTokenProvider::new("test-token"));
    let err = client
        .send_to_device("device-abc", "Hi", "There", None)
        .await
        .unwrap_err();

    assert!(matches!(err, FcmError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    let client = FcmClient::new(fixture_key())
        .with_api_base("http://127.0.0.1:1")
        .with_token_provider(StaticTokenProvider::new("test-token"));

    let err = client
        .send_to_device("device-abc", "Hi", "There", None)
        .await
        .unwrap_err();

    assert!(matches!(err, FcmError::Transport(_)));
    assert!(err.provider_failure().is_none());
}
