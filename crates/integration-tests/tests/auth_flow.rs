//! Auth session scenarios against mocked identity and profile services.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use shophub_core::Role;
use shophub_storefront::services::auth::{AuthError, AuthSession, SessionState};
use shophub_storefront::services::identity::IdentityClient;
use shophub_storefront::services::profiles::ProfileStore;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session(identity_url: &str, profiles_url: &str) -> AuthSession {
    shophub_storefront::telemetry::init();
    let provider = Arc::new(
        IdentityClient::with_base_url(identity_url, SecretString::from("test-key"))
            .expect("identity client should build"),
    );
    let profiles = Arc::new(ProfileStore::new(profiles_url).expect("profile store should build"));
    AuthSession::new(provider, profiles)
}

async fn mock_sign_in(server: &MockServer, uid: &str, email: &str, display_name: Option<&str>) {
    let mut body = serde_json::json!({
        "localId": uid,
        "email": email,
        "idToken": "id-token-1",
        "refreshToken": "refresh-token-1",
    });
    if let Some(name) = display_name {
        body["displayName"] = serde_json::json!(name);
    }
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Poll until `check` passes; the session listener runs asynchronously.
async fn wait_until(check: impl Fn() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn session_settles_to_anonymous_without_a_sign_in() {
    let identity = MockServer::start().await;
    let profiles = MockServer::start().await;

    let auth = session(&identity.uri(), &profiles.uri());
    wait_until(|| auth.state() == SessionState::Anonymous).await;
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn login_maps_stored_profile_fields() {
    let identity = MockServer::start().await;
    let profiles = MockServer::start().await;

    mock_sign_in(&identity, "uid-1", "jane@example.com", None).await;
    Mock::given(method("GET"))
        .and(path("/profiles/uid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "fullName": "Jane Doe",
            "role": "admin",
            "createdAt": 1_700_000_000_000_i64,
        })))
        .mount(&profiles)
        .await;

    let auth = session(&identity.uri(), &profiles.uri());
    let profile = auth
        .login("jane@example.com", "hunter2!")
        .await
        .expect("login should succeed");

    assert_eq!(profile.id, "uid-1");
    assert_eq!(profile.email, "jane@example.com");
    assert_eq!(profile.name, "Jane Doe");
    assert_eq!(profile.role, Role::Admin);
    assert!(auth.is_authenticated());
    assert_eq!(auth.profile(), Some(profile));
}

#[tokio::test]
async fn login_creates_default_document_when_absent() {
    let identity = MockServer::start().await;
    let profiles = MockServer::start().await;

    mock_sign_in(&identity, "uid-2", "sam@example.com", None).await;
    Mock::given(method("GET"))
        .and(path("/profiles/uid-2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&profiles)
        .await;
    // The default document carries the customer role and the email-derived
    // name. Written at least once (the session listener may resolve again).
    Mock::given(method("PUT"))
        .and(path("/profiles/uid-2"))
        .and(body_partial_json(serde_json::json!({
            "fullName": "sam",
            "role": "customer",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1..)
        .mount(&profiles)
        .await;

    let auth = session(&identity.uri(), &profiles.uri());
    let profile = auth
        .login("sam@example.com", "hunter2!")
        .await
        .expect("login should succeed");

    assert_eq!(profile.name, "sam");
    assert_eq!(profile.role, Role::Customer);
}

#[tokio::test]
async fn login_degrades_when_profile_store_is_down() {
    let identity = MockServer::start().await;
    let profiles = MockServer::start().await;

    mock_sign_in(&identity, "uid-3", "kim@example.com", Some("Kim Lee")).await;
    Mock::given(method("GET"))
        .and(path("/profiles/uid-3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("store exploded"))
        .mount(&profiles)
        .await;

    let auth = session(&identity.uri(), &profiles.uri());
    let profile = auth
        .login("kim@example.com", "hunter2!")
        .await
        .expect("login should still succeed");

    // Fail-open: provider-supplied fields, role forced to customer.
    assert_eq!(profile.name, "Kim Lee");
    assert_eq!(profile.role, Role::Customer);
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn failed_login_leaves_session_state_unchanged() {
    let identity = MockServer::start().await;
    let profiles = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_string("INVALID_PASSWORD"))
        .mount(&identity)
        .await;

    let auth = session(&identity.uri(), &profiles.uri());
    wait_until(|| auth.state() == SessionState::Anonymous).await;

    let err = auth
        .login("jane@example.com", "wrong")
        .await
        .expect_err("bad credentials should fail");
    assert!(matches!(err, AuthError::Provider(_)));
    assert_eq!(auth.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn login_rejects_malformed_email_locally() {
    let identity = MockServer::start().await;
    let profiles = MockServer::start().await;

    let auth = session(&identity.uri(), &profiles.uri());
    let err = auth
        .login("not-an-email", "hunter2!")
        .await
        .expect_err("malformed email should fail");
    assert!(matches!(err, AuthError::InvalidEmail(_)));
}

#[tokio::test]
async fn register_sets_display_name_and_merges_profile() {
    let identity = MockServer::start().await;
    let profiles = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "localId": "uid-4",
            "email": "new@example.com",
            "idToken": "id-token-1",
            "refreshToken": "refresh-token-1",
        })))
        .mount(&identity)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:update"))
        .and(body_partial_json(serde_json::json!({ "displayName": "New Person" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "localId": "uid-4",
            "email": "new@example.com",
            "displayName": "New Person",
            "idToken": "id-token-1",
            "refreshToken": "refresh-token-1",
        })))
        .expect(1)
        .mount(&identity)
        .await;
    // Initial document write uses merge semantics (PATCH, not PUT).
    Mock::given(method("PATCH"))
        .and(path("/profiles/uid-4"))
        .and(body_partial_json(serde_json::json!({
            "fullName": "New Person",
            "role": "customer",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&profiles)
        .await;
    Mock::given(method("GET"))
        .and(path("/profiles/uid-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "fullName": "New Person",
            "role": "customer",
        })))
        .mount(&profiles)
        .await;

    let auth = session(&identity.uri(), &profiles.uri());
    let profile = auth
        .register("new@example.com", "hunter2!", Some("New Person"))
        .await
        .expect("registration should succeed");

    assert_eq!(profile.name, "New Person");
    assert_eq!(profile.role, Role::Customer);
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn register_rejects_short_password_before_any_request() {
    let identity = MockServer::start().await;
    let profiles = MockServer::start().await;

    let auth = session(&identity.uri(), &profiles.uri());
    let err = auth
        .register("new@example.com", "abc", None)
        .await
        .expect_err("short password should fail");
    assert!(matches!(err, AuthError::WeakPassword(_)));
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn logout_returns_to_anonymous_and_drops_token() {
    let identity = MockServer::start().await;
    let profiles = MockServer::start().await;

    mock_sign_in(&identity, "uid-5", "jane@example.com", None).await;
    Mock::given(method("GET"))
        .and(path("/profiles/uid-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "fullName": "Jane Doe",
        })))
        .mount(&profiles)
        .await;

    let auth = session(&identity.uri(), &profiles.uri());
    auth.login("jane@example.com", "hunter2!")
        .await
        .expect("login should succeed");
    wait_until(|| auth.is_authenticated()).await;

    auth.logout();
    wait_until(|| auth.state() == SessionState::Anonymous).await;
    // Let the session listener drain; the state must stay anonymous.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(auth.state(), SessionState::Anonymous);
    assert_eq!(auth.profile(), None);
    assert_eq!(
        auth.access_token().await.expect("no error when signed out"),
        None
    );
}
