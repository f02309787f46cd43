//! Session lifecycle against a mocked identity endpoint.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use organizer_client::classifier::ErrorCode;
use organizer_client::session::{
    FileTokenStore, MemoryTokenStore, OAuthCallback, SessionManager, SessionStatus, TokenStore,
};
use serde_json::json;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_identity(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path(api_path("/auth/me")))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("user-1")))
        .mount(server)
        .await;
}

async fn mount_rejection(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(api_path("/auth/me")))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body(
            "UNAUTHORIZED",
            "Invalid or expired token",
            "/api/v1/auth/me",
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_restore_with_valid_token_authenticates() {
    let server = MockServer::start().await;
    mount_identity(&server, "good-token").await;

    let store = Arc::new(MemoryTokenStore::with_token("good-token"));
    let manager = session(&server, store.clone());

    assert_eq!(manager.restore().await, SessionStatus::Authenticated);
    assert!(manager.is_authenticated());

    let snapshot = manager.session();
    assert_eq!(snapshot.token.as_deref(), Some("good-token"));
    assert_eq!(snapshot.current_user.unwrap().id, "user-1");
    assert_eq!(store.load().unwrap().as_deref(), Some("good-token"));
}

#[tokio::test]
async fn test_restore_with_rejected_token_clears_everything() {
    let server = MockServer::start().await;
    mount_rejection(&server).await;

    let store = Arc::new(MemoryTokenStore::with_token("expired-token"));
    let manager = session(&server, store.clone());

    assert_eq!(manager.restore().await, SessionStatus::Unauthenticated);
    assert!(!manager.is_authenticated());
    assert!(manager.session().token.is_none());
    assert!(manager.current_user().is_none());
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn test_restore_with_server_error_also_discards_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/auth/me")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("some-token"));
    let manager = session(&server, store.clone());

    assert_eq!(manager.restore().await, SessionStatus::Unauthenticated);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn test_restore_without_token_makes_no_request() {
    let server = MockServer::start().await;
    let manager = session(&server, Arc::new(MemoryTokenStore::new()));

    assert_eq!(manager.restore().await, SessionStatus::Unauthenticated);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_persists_token_and_resolves_after_identity() {
    let server = MockServer::start().await;
    mount_identity(&server, "fresh-token").await;

    let store = Arc::new(MemoryTokenStore::new());
    let manager = session(&server, store.clone());

    let user = assert_ok!(manager.login("fresh-token").await);
    assert_eq!(user.email, "reflective@example.com");
    assert_eq!(manager.status(), SessionStatus::Authenticated);
    assert!(manager.is_authenticated());
    assert_eq!(store.load().unwrap().as_deref(), Some("fresh-token"));
}

#[tokio::test]
async fn test_login_failure_surfaces_error_and_discards_token() {
    let server = MockServer::start().await;
    mount_rejection(&server).await;

    let store = Arc::new(MemoryTokenStore::new());
    let manager = session(&server, store.clone());

    let err = assert_err!(manager.login("bad-token").await);
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert!(err.requires_reauth());
    assert_eq!(manager.status(), SessionStatus::Unauthenticated);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn test_status_is_authenticating_while_identity_in_flight() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/auth/me")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_json("user-1"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let manager = Arc::new(session(&server, Arc::new(MemoryTokenStore::new())));
    let login = tokio::spawn({
        let manager = manager.clone();
        async move { manager.login("slow-token").await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(manager.status(), SessionStatus::Authenticating);
    assert!(!manager.is_authenticated());

    login.await.unwrap().unwrap();
    assert_eq!(manager.status(), SessionStatus::Authenticated);
}

#[tokio::test]
async fn test_logout_during_identity_fetch_wins() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/auth/me")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_json("user-1"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let manager = Arc::new(session(&server, store.clone()));
    let login = tokio::spawn({
        let manager = manager.clone();
        async move { manager.login("slow-token").await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    manager.logout();

    login.await.unwrap().unwrap();
    assert_eq!(manager.status(), SessionStatus::Unauthenticated);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn test_logout_clears_session_and_store() {
    let server = MockServer::start().await;
    mount_identity(&server, "good-token").await;

    let store = Arc::new(MemoryTokenStore::new());
    let manager = session(&server, store.clone());
    manager.login("good-token").await.unwrap();

    manager.logout();

    assert!(!manager.is_authenticated());
    assert_eq!(manager.status(), SessionStatus::Unauthenticated);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn test_refresh_replaces_token() {
    let server = MockServer::start().await;
    mount_identity(&server, "old-token").await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/refresh")))
        .and(header("authorization", "Bearer old-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "new-token" })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let manager = session(&server, store.clone());
    manager.login("old-token").await.unwrap();

    assert_ok!(manager.refresh().await);
    assert_eq!(manager.session().token.as_deref(), Some("new-token"));
    assert_eq!(store.load().unwrap().as_deref(), Some("new-token"));
    assert!(manager.is_authenticated());
}

#[tokio::test]
async fn test_rejected_refresh_logs_out() {
    let server = MockServer::start().await;
    mount_identity(&server, "old-token").await;

    Mock::given(method("POST"))
        .and(path(api_path("/auth/refresh")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let manager = session(&server, store.clone());
    manager.login("old-token").await.unwrap();

    let err = assert_err!(manager.refresh().await);
    assert!(err.requires_reauth());
    assert!(!manager.is_authenticated());
    assert_eq!(store.load().unwrap(), None);
}

async fn mount_slow_refresh(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(api_path("/auth/refresh")))
        .and(header("authorization", "Bearer old-token"))
        .respond_with(response.set_delay(Duration::from_millis(200)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_logout_during_refresh_is_not_undone() {
    let server = MockServer::start().await;
    mount_identity(&server, "old-token").await;
    mount_slow_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "token": "new-token" })),
    )
    .await;

    let store = Arc::new(MemoryTokenStore::new());
    let manager = session(&server, store.clone());
    manager.login("old-token").await.unwrap();

    let (refreshed, ()) = tokio::join!(manager.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        manager.logout();
    });

    assert_ok!(refreshed);
    assert!(!manager.is_authenticated());
    assert!(manager.session().token.is_none());
    assert_eq!(store.load().unwrap(), None);
    assert_eq!(manager.restore().await, SessionStatus::Unauthenticated);
}

#[tokio::test]
async fn test_newer_login_during_refresh_keeps_newer_token() {
    let server = MockServer::start().await;
    mount_identity(&server, "old-token").await;
    mount_identity(&server, "newer-token").await;
    mount_slow_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "token": "new-token" })),
    )
    .await;

    let store = Arc::new(MemoryTokenStore::new());
    let manager = session(&server, store.clone());
    manager.login("old-token").await.unwrap();

    let (refreshed, login) = tokio::join!(manager.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        manager.login("newer-token").await
    });

    assert_ok!(refreshed);
    assert_ok!(login);
    assert!(manager.is_authenticated());
    assert_eq!(manager.session().token.as_deref(), Some("newer-token"));
    assert_eq!(store.load().unwrap().as_deref(), Some("newer-token"));
}

#[tokio::test]
async fn test_rejected_refresh_after_newer_login_keeps_session() {
    let server = MockServer::start().await;
    mount_identity(&server, "old-token").await;
    mount_identity(&server, "newer-token").await;
    mount_slow_refresh(&server, ResponseTemplate::new(401)).await;

    let store = Arc::new(MemoryTokenStore::new());
    let manager = session(&server, store.clone());
    manager.login("old-token").await.unwrap();

    let (refreshed, login) = tokio::join!(manager.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        manager.login("newer-token").await
    });

    let err = assert_err!(refreshed);
    assert!(err.requires_reauth());
    assert_ok!(login);
    assert!(manager.is_authenticated());
    assert_eq!(manager.session().token.as_deref(), Some("newer-token"));
    assert_eq!(store.load().unwrap().as_deref(), Some("newer-token"));
}

#[tokio::test]
async fn test_oauth_callback_logs_in_with_returned_token() {
    let server = MockServer::start().await;
    mount_identity(&server, "oauth-token").await;

    let manager = session(&server, Arc::new(MemoryTokenStore::new()));
    let callback =
        OAuthCallback::from_redirect_url("http://localhost:3000/auth/callback?token=oauth-token")
            .unwrap();

    let user = manager.complete_oauth(callback).await.unwrap();
    assert_eq!(user.id, "user-1");
    assert!(manager.is_authenticated());
}

#[tokio::test]
async fn test_oauth_error_never_reaches_the_server() {
    let server = MockServer::start().await;
    let manager = session(&server, Arc::new(MemoryTokenStore::new()));

    let err = manager
        .complete_oauth(OAuthCallback::from_query("error=access_denied"))
        .await
        .unwrap_err();

    assert_eq!(err.message, "Authentication failed. Please try again.");
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(manager.status(), SessionStatus::Unauthenticated);
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let server = MockServer::start().await;
    mount_identity(&server, "persisted-token").await;

    let temp_dir = TempDir::new().unwrap();
    let token_path = temp_dir.path().join("organizer").join("auth_token");

    let first = SessionManager::new(
        api_client(&server),
        Arc::new(FileTokenStore::new(&token_path)),
    );
    first.login("persisted-token").await.unwrap();
    drop(first);

    let second = SessionManager::new(
        api_client(&server),
        Arc::new(FileTokenStore::new(&token_path)),
    );
    assert_eq!(second.restore().await, SessionStatus::Authenticated);
}
