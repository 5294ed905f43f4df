//! Session lifecycle tests against a mock admin API.
//!
//! These tests use wiremock to simulate the backend and check login,
//! verification, token binding and teardown without network access.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use studio_core::error::{AuthError, TransportError};
use studio_core::{AccessToken, ApiRoot, Credentials, Error, ResourceFamily, Session, User};
use studio_http::{ApiClientFactory, FamilyClient, SessionManager};
use studio_store::{FileStorage, MemoryStorage, SESSION_KEY, SessionStorage};

/// Helper to create an API root from a mock server.
fn mock_root(server: &MockServer) -> ApiRoot {
    ApiRoot::new(server.uri()).unwrap()
}

fn manager(server: &MockServer) -> SessionManager<MemoryStorage> {
    SessionManager::new(ApiClientFactory::new(mock_root(server)), MemoryStorage::new()).unwrap()
}

fn login_body(token: &str) -> serde_json::Value {
    json!({
        "code": 0,
        "message": "ok",
        "data": {
            "token": token,
            "user": {"id": "u1", "email": "a@b.com", "name": "Ops"},
            "permissions": ["templates:read", "jobs:write"],
            "expires_at": "2099-01-01T00:00:00Z"
        }
    })
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v1/admin/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body(token)))
        .mount(server)
        .await;
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_success_persists_and_binds_clients() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/auth/login"))
        .and(body_json(json!({"email": "a@b.com", "password": "secret123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("t1")))
        .expect(1)
        .mount(&server)
        .await;

    let manager = manager(&server);
    let session = manager
        .login(&Credentials::new("a@b.com", "secret123"))
        .await
        .unwrap();

    assert_eq!(session.token, AccessToken::new("t1"));
    assert_eq!(session.user.name(), Some("Ops"));
    assert_eq!(session.permissions, vec!["templates:read", "jobs:write"]);

    assert_eq!(manager.load(), Some(session));
    for family in ResourceFamily::ALL {
        assert!(manager.registry().is_initialized(family));
    }
}

#[tokio::test]
async fn test_login_wrong_password_is_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "message": "Invalid email or password"
        })))
        .mount(&server)
        .await;

    let manager = manager(&server);
    let err = manager
        .login(&Credentials::new("a@b.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::InvalidCredentials)));
    assert!(manager.load().is_none());
    assert!(!manager.registry().is_initialized(ResourceFamily::Templates));
}

#[tokio::test]
async fn test_login_with_dead_relative_expiry_stores_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {
                "token": "t1",
                "user": {"id": "u1", "email": "a@b.com"},
                "expires_in": -60
            }
        })))
        .mount(&server)
        .await;

    let manager = manager(&server);
    let err = manager
        .login(&Credentials::new("a@b.com", "secret123"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(TransportError::Decode { .. })));
    assert!(manager.store().peek().is_none());
    assert!(!manager.registry().is_initialized(ResourceFamily::Templates));
}

#[tokio::test]
async fn test_login_error_message_is_surfaced_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": 4031,
            "message": "Account disabled by administrator"
        })))
        .mount(&server)
        .await;

    let err = manager(&server)
        .login(&Credentials::new("a@b.com", "secret"))
        .await
        .unwrap_err();

    match err {
        Error::Remote(remote) => {
            assert_eq!(remote.status, 403);
            assert_eq!(remote.code, Some(4031));
            assert_eq!(remote.message, "Account disabled by administrator");
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_server_error_without_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/auth/login"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = manager(&server)
        .login(&Credentials::new("a@b.com", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::Status { status: 502 })
    ));
}

#[tokio::test]
async fn test_login_unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let root = mock_root(&server);
    drop(server);

    let manager =
        SessionManager::new(ApiClientFactory::new(root), MemoryStorage::new()).unwrap();
    let err = manager
        .login(&Credentials::new("a@b.com", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(!err.is_invalid_credentials());
}

#[tokio::test]
async fn test_relogin_rebinds_every_client() {
    let server = MockServer::start().await;
    mount_login(&server, "t1").await;

    let manager = manager(&server);
    manager
        .login(&Credentials::new("a@b.com", "secret"))
        .await
        .unwrap();
    let before = manager.registry().jobs(None).unwrap();

    server.reset().await;
    mount_login(&server, "t2").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/jobs/stats"))
        .and(header("authorization", "Bearer t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "ok",
            "data": {"total": 10, "unacknowledged": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    manager
        .login(&Credentials::new("a@b.com", "secret"))
        .await
        .unwrap();
    let after = manager.registry().jobs(None).unwrap();
    assert!(!Arc::ptr_eq(before.resource(), after.resource()));

    use studio_http::Triage;
    let stats = after.stats().await.unwrap();
    assert_eq!(stats.unacknowledged, 2);
}

// ============================================================================
// Verification
// ============================================================================

#[tokio::test]
async fn test_verify_accepts_and_rejects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/auth/verify"))
        .and(header("authorization", "Bearer good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0, "message": "ok", "data": {"valid": true}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/auth/verify"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let manager = manager(&server);
    assert!(manager.auth().verify(&AccessToken::new("good")).await.unwrap());
    assert!(!manager.auth().verify(&AccessToken::new("stale")).await.unwrap());
}

#[tokio::test]
async fn test_verify_propagates_other_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/auth/verify"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": 500, "message": "database unavailable"
        })))
        .mount(&server)
        .await;

    let err = manager(&server)
        .auth()
        .verify(&AccessToken::new("t"))
        .await
        .unwrap_err();
    assert_eq!(err.remote_message(), Some("database unavailable"));
}

#[tokio::test]
async fn test_verify_without_session_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/auth/verify"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(!manager(&server).verify().await.unwrap());
}

#[tokio::test]
async fn test_current_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/auth/me"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "ok",
            "data": {"id": 9, "email": "ops@studio.app", "role": "admin"}
        })))
        .mount(&server)
        .await;

    let user = manager(&server)
        .auth()
        .current_user(&AccessToken::new("t1"))
        .await
        .unwrap();
    assert_eq!(user.id, "9");
    assert_eq!(user.extra["role"], "admin");
}

// ============================================================================
// Token binding and teardown
// ============================================================================

#[tokio::test]
async fn test_reinit_sends_only_the_newest_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/templates/categories"))
        .and(header("authorization", "Bearer tokenB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "ok",
            "data": [{"id": "c1", "name": "Portrait"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer tokenA"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let manager = manager(&server);
    let registry = manager.registry();
    registry
        .init(ResourceFamily::Templates, &AccessToken::new("tokenA"))
        .unwrap();
    registry
        .init(ResourceFamily::Templates, &AccessToken::new("tokenB"))
        .unwrap();

    let categories = registry.templates(None).unwrap().categories().await.unwrap();
    assert_eq!(categories[0].name, "Portrait");
}

#[tokio::test]
async fn test_get_with_token_then_without_is_same_instance() {
    let server = MockServer::start().await;
    let manager = manager(&server);
    let token = AccessToken::new("tokenA");

    let first = manager
        .registry()
        .get(ResourceFamily::Alerts, Some(&token))
        .unwrap();
    let second = manager.registry().get(ResourceFamily::Alerts, None).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_logout_leaves_no_client_behind() {
    let server = MockServer::start().await;
    mount_login(&server, "t1").await;

    let manager = manager(&server);
    manager
        .login(&Credentials::new("a@b.com", "secret"))
        .await
        .unwrap();

    manager.logout().unwrap();

    assert!(manager.load().is_none());
    for family in ResourceFamily::ALL {
        let err = manager.registry().get(family, None).unwrap_err();
        assert!(matches!(err, Error::NotInitialized { family: f } if f == family));
    }
}

#[tokio::test]
async fn test_revoked_token_is_reported_and_tears_down() {
    let server = MockServer::start().await;
    mount_login(&server, "t1").await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/dashboard/summary"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401, "message": "token revoked"
        })))
        .mount(&server)
        .await;

    let manager = manager(&server);
    manager
        .login(&Credentials::new("a@b.com", "secret"))
        .await
        .unwrap();

    let err = manager
        .registry()
        .dashboard(None)
        .unwrap()
        .summary()
        .await
        .unwrap_err();
    assert!(err.is_unauthenticated());

    assert!(manager.handle_error(&err).unwrap());
    assert!(manager.load().is_none());
    assert!(
        manager
            .registry()
            .dashboard(None)
            .unwrap_err()
            .is_not_initialized()
    );
}

// ============================================================================
// Persistence through the file backend
// ============================================================================

#[tokio::test]
async fn test_file_backed_session_round_trip_and_expiry() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let manager = SessionManager::new(
        ApiClientFactory::new(mock_root(&server)),
        FileStorage::new(dir.path()),
    )
    .unwrap();

    let saved = Session::new(
        AccessToken::new("t1"),
        User::new("u1", "a@b.com"),
        vec!["read".to_string()],
        "2099-01-01T00:00:00Z".parse().unwrap(),
    );
    manager.store().save(&saved).unwrap();
    assert_eq!(manager.load(), Some(saved));

    manager
        .store()
        .storage()
        .set(
            SESSION_KEY,
            r#"{"token":"t1","user":{"id":"u1","email":"a@b.com"},"permissions":["read"],"expires_at":"2000-01-01T00:00:00Z"}"#,
        )
        .unwrap();
    manager.registry().init_all(&AccessToken::new("t1")).unwrap();

    assert!(manager.load().is_none());
    assert!(manager.store().storage().get(SESSION_KEY).is_none());
    for family in ResourceFamily::ALL {
        assert!(
            manager
                .registry()
                .get(family, None)
                .unwrap_err()
                .is_not_initialized()
        );
    }
}
