#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "panics are the assertion mechanism in integration tests")]

use connector_sync_client::CredentialSession;
use connector_sync_types::{ProviderConfig, SyncError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_for(server: &MockServer) -> CredentialSession {
    let mut config = ProviderConfig::new("client-123", "s3cret");
    config.auth_url = format!("{}/oauth/token", server.uri());
    CredentialSession::new(&config, reqwest::Client::new())
}

fn token_body(token: &str, expires_in: i64) -> serde_json::Value {
    serde_json::json!({ "access_token": token, "expires_in": expires_in, "token_type": "Bearer" })
}

#[tokio::test]
async fn test_valid_credential_is_reused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("audience=wiz-api"))
        .and(body_string_contains("client_id=client-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok-1", 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let cancel = CancellationToken::new();

    let first = session.ensure_valid(&cancel).await.expect("first exchange");
    let second = session.ensure_valid(&cancel).await.expect("cached");

    assert_eq!(first.access_token(), "tok-1");
    assert_eq!(first, second);
    let remaining = first.remaining_seconds();
    assert!((3590..=3600).contains(&remaining), "remaining {remaining}");
}

#[tokio::test]
async fn test_expired_credential_triggers_new_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("short-lived", 0)))
        .expect(2)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let cancel = CancellationToken::new();

    session.ensure_valid(&cancel).await.expect("first exchange");
    session.ensure_valid(&cancel).await.expect("second exchange");
}

#[tokio::test]
async fn test_invalidate_forces_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("tok", 3600)))
        .expect(2)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let cancel = CancellationToken::new();

    session.ensure_valid(&cancel).await.expect("first exchange");
    session.invalidate().await;
    session.ensure_valid(&cancel).await.expect("after invalidate");
}

#[tokio::test]
async fn test_concurrent_callers_share_one_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("shared", 3600))
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = Arc::new(session_for(&server));
    let cancel = CancellationToken::new();

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let session = Arc::clone(&session);
            let cancel = cancel.clone();
            tokio::spawn(async move { session.ensure_valid(&cancel).await })
        })
        .collect();

    for handle in handles {
        let credential = handle.await.expect("join").expect("credential");
        assert_eq!(credential.access_token(), "shared");
    }
}

#[tokio::test]
async fn test_rejected_credentials_are_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("access_denied"))
        .mount(&server)
        .await;

    let err = session_for(&server)
        .ensure_valid(&CancellationToken::new())
        .await
        .expect_err("401 must fail");

    assert!(err.is_authentication());
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("status code: 401"), "{err}");
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = session_for(&server)
        .ensure_valid(&CancellationToken::new())
        .await
        .expect_err("503 must fail");

    assert!(matches!(err, SyncError::Authentication { transient: true, .. }), "{err:?}");
}

#[tokio::test]
async fn test_malformed_body_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = session_for(&server)
        .ensure_valid(&CancellationToken::new())
        .await
        .expect_err("bad body must fail");

    assert!(matches!(err, SyncError::Authentication { transient: false, .. }), "{err:?}");
    assert!(err.to_string().contains("error parsing authentication response"));
}

#[tokio::test]
async fn test_cancelled_before_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("never", 3600)))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = session_for(&server).ensure_valid(&cancel).await.expect_err("cancelled");
    assert_eq!(err, SyncError::Cancelled);
}
