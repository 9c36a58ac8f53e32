//! Integration tests for `IdentityClient` using wiremock HTTP mocks.

use secrecy::SecretString;
use shophub_storefront::services::identity::{IdentityClient, IdentityError};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> IdentityClient {
    IdentityClient::with_base_url(base_url, SecretString::from("test-key"))
        .expect("client construction should not fail")
}

fn account_body(uid: &str, email: &str, display_name: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "localId": uid,
        "email": email,
        "idToken": "id-token-1",
        "refreshToken": "refresh-token-1",
    });
    if let Some(name) = display_name {
        body["displayName"] = serde_json::json!(name);
    }
    body
}

#[tokio::test]
async fn sign_in_establishes_session_and_broadcasts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "email": "jane@example.com",
            "password": "hunter2!",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(account_body("uid-1", "jane@example.com", Some("Jane"))),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut changes = client.subscribe();
    assert_eq!(*changes.borrow_and_update(), None);

    let user = client
        .sign_in("jane@example.com", "hunter2!")
        .await
        .expect("sign in should succeed");

    assert_eq!(user.uid, "uid-1");
    assert_eq!(user.email, "jane@example.com");
    assert_eq!(user.display_name.as_deref(), Some("Jane"));
    assert_eq!(client.current_user(), Some(user.clone()));

    changes.changed().await.expect("sender alive");
    assert_eq!(*changes.borrow_and_update(), Some(user));
}

#[tokio::test]
async fn sign_in_failure_carries_response_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_string("INVALID_PASSWORD"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .sign_in("jane@example.com", "wrong")
        .await
        .expect_err("bad credentials should fail");

    match err {
        IdentityError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("INVALID_PASSWORD"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(client.current_user(), None);
}

#[tokio::test]
async fn create_account_signs_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(account_body("uid-2", "new@example.com", None)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let user = client
        .create_account("new@example.com", "hunter2!")
        .await
        .expect("sign up should succeed");

    assert_eq!(user.uid, "uid-2");
    assert_eq!(user.display_name, None);
    assert!(client.current_user().is_some());
}

#[tokio::test]
async fn get_token_is_none_when_signed_out() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    let token = client.get_token(true).await.expect("no error when signed out");
    assert_eq!(token, None);
}

#[tokio::test]
async fn get_token_force_refresh_stores_new_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(account_body("uid-1", "jane@example.com", None)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "grant_type": "refresh_token",
            "refresh_token": "refresh-token-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id_token": "id-token-2",
            "refresh_token": "refresh-token-2",
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .sign_in("jane@example.com", "hunter2!")
        .await
        .expect("sign in should succeed");

    // Cached token without refresh, fresh token with.
    assert_eq!(
        client.get_token(false).await.expect("cached token"),
        Some("id-token-1".to_string())
    );
    assert_eq!(
        client.get_token(true).await.expect("refresh should succeed"),
        Some("id-token-2".to_string())
    );
    assert_eq!(
        client.get_token(false).await.expect("cached token"),
        Some("id-token-2".to_string())
    );
}

#[tokio::test]
async fn sign_out_clears_session_and_broadcasts_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(account_body("uid-1", "jane@example.com", None)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .sign_in("jane@example.com", "hunter2!")
        .await
        .expect("sign in should succeed");

    let mut changes = client.subscribe();
    client.sign_out();

    assert_eq!(client.current_user(), None);
    changes.changed().await.expect("sender alive");
    assert_eq!(*changes.borrow_and_update(), None);
    assert_eq!(client.get_token(true).await.expect("no error"), None);
}

#[tokio::test]
async fn update_display_name_requires_session() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());

    let err = client
        .update_display_name("Jane")
        .await
        .expect_err("requires a session");
    assert!(matches!(err, IdentityError::NotSignedIn));
}

#[tokio::test]
async fn update_display_name_updates_current_user() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(account_body("uid-3", "sam@example.com", None)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:update"))
        .and(body_partial_json(serde_json::json!({
            "idToken": "id-token-1",
            "displayName": "Sam Smith",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "localId": "uid-3",
            "email": "sam@example.com",
            "displayName": "Sam Smith",
            "idToken": "id-token-1",
            "refreshToken": "refresh-token-1",
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .create_account("sam@example.com", "hunter2!")
        .await
        .expect("sign up should succeed");
    client
        .update_display_name("Sam Smith")
        .await
        .expect("update should succeed");

    let user = client.current_user().expect("still signed in");
    assert_eq!(user.display_name.as_deref(), Some("Sam Smith"));
}
