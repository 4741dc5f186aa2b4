//! Client session manager against a live server on an ephemeral port.

use serde_json::Value;
use session_guard_api::app::{AppState, build_router};
use session_guard_api::client::{ClientSessionManager, MemoryCredentialStore};
use session_guard_api::clock::ManualClock;
use session_guard_api::error::ClientError;
use session_guard_api::models::{AppConfig, SessionSettings, UserAccount, UserRole};
use session_guard_api::session::{MemorySessionStore, SessionStore};
use std::sync::Arc;

const START: i64 = 1_700_000_000_000;
const MINUTE: i64 = 60_000;
const PASSWORD: &str = "hunter2hunter2";

struct Harness {
    client: ClientSessionManager,
    clock: Arc<ManualClock>,
    store: Arc<MemorySessionStore>,
}

async fn spawn_server() -> Harness {
    let config = Arc::new(AppConfig {
        users: vec![UserAccount {
            id: "mentee-7".to_string(),
            email: "mentee@example.com".to_string(),
            name: "Alan".to_string(),
            role: UserRole::Mentee,
            password_hash: bcrypt::hash(PASSWORD, 4).unwrap(),
        }],
        session: SessionSettings {
            sign_in_path: "/welcome-back".to_string(),
            ..Default::default()
        },
        ..Default::default()
    });

    // Server and client share one clock so idle time can be stepped
    let clock = Arc::new(ManualClock::new(START));
    let store = Arc::new(MemorySessionStore::new());
    let state = AppState::new(config, store.clone(), clock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    let client = ClientSessionManager::new(
        format!("http://{}", addr),
        Arc::new(MemoryCredentialStore::new()),
        clock.clone(),
    )
    .with_sign_in_path("/signin");

    Harness {
        client,
        clock,
        store,
    }
}

#[tokio::test]
async fn test_login_then_fetch_profile() {
    let h = spawn_server().await;

    let login = h.client.login("mentee@example.com", PASSWORD).await.unwrap();
    assert_eq!(login.user.id, "mentee-7");
    assert_eq!(login.sign_in_path, "/welcome-back");
    assert!(h.client.is_authenticated());
    assert_eq!(h.client.token(), Some(login.token.clone()));

    h.clock.advance(5 * MINUTE);
    let profile: Value = h.client.get_json("/api/me").await.unwrap();
    assert_eq!(profile["name"], "Alan");
    assert_eq!(h.client.last_activity(), Some(START + 5 * MINUTE));
}

#[tokio::test]
async fn test_bad_password_is_not_session_expiry() {
    let h = spawn_server().await;

    let err = h
        .client
        .login("mentee@example.com", "nope")
        .await
        .unwrap_err();

    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(h.client.token().is_none());
}

#[tokio::test]
async fn test_server_side_destroy_detected_lazily() {
    let h = spawn_server().await;
    let login = h.client.login("mentee@example.com", PASSWORD).await.unwrap();

    // Session disappears server-side; the client only learns on its next call
    h.store.destroy(&login.token).await.unwrap();
    assert!(h.client.is_authenticated());

    let err = h.client.get_json::<Value>("/api/me").await.unwrap_err();
    match err {
        ClientError::SessionExpired {
            message,
            redirect_to,
        } => {
            assert_eq!(message, "Session expired. Please log in again.");
            // The path announced by the server replaces the client default
            assert_eq!(redirect_to, "/welcome-back");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(h.client.token().is_none());
    assert!(!h.client.is_authenticated());
}

#[tokio::test]
async fn test_idle_expiry_clears_credentials() {
    let h = spawn_server().await;
    let login = h.client.login("mentee@example.com", PASSWORD).await.unwrap();

    // Backdate the local activity so only the server decides
    h.clock.advance(31 * MINUTE);
    h.client.record_activity().unwrap();

    let err = h.client.get_json::<Value>("/api/session").await.unwrap_err();
    match err {
        ClientError::SessionExpired { message, .. } => {
            assert_eq!(
                message,
                "Session expired due to inactivity. Please log in again."
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(h.client.token().is_none());
    assert!(h.store.get(&login.token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_logout_requests_server_destroy() {
    let h = spawn_server().await;
    let login = h.client.login("mentee@example.com", PASSWORD).await.unwrap();

    let handle = h.client.logout().expect("logout request was sent");
    assert!(h.client.token().is_none());

    handle.await.unwrap();
    assert!(h.store.get(&login.token).await.unwrap().is_none());
}
