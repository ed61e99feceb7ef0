//! Login, persistence across restarts, and logout with the file store.

mod common;

use gestor::adapters::FileStore;
use gestor::auth::session::{TOKEN_KEY, USER_KEY};
use gestor::auth::SessionManager;
use gestor::error::{GestorError, SessionError};
use gestor::models::Role;
use gestor::traits::LocalStore;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::api;

async fn mount_login(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"usuario": "ana", "password": "secreto"})))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_persists_and_restores() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-1",
            "user": {"_id": "u1", "nombre": "Ana", "usuario": "ana", "email": "ana@x.cl",
                     "rol": "encargado", "password": "hash"}
        })),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut sessions = SessionManager::restore(FileStore::in_dir(dir.path()));
    assert!(!sessions.is_authenticated());

    let user = sessions.login(&api(&server), "ana", "secreto").await.unwrap();
    assert_eq!(user.rol, Role::Encargado);

    let stored = std::fs::read_to_string(dir.path().join("storage.json")).unwrap();
    assert!(stored.contains("jwt-1"));
    assert!(!stored.contains("hash"));

    let restored = SessionManager::restore(FileStore::in_dir(dir.path()));
    assert!(restored.is_authenticated());
    assert_eq!(restored.session().usuario(), Some("ana"));
    assert_eq!(restored.session().role(), Some(Role::Encargado));
}

#[tokio::test]
async fn test_rejected_login_keeps_previous_state() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({"message": "Credenciales inválidas"})),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut sessions = SessionManager::restore(FileStore::in_dir(dir.path()));
    let err = sessions.login(&api(&server), "ana", "secreto").await.unwrap_err();
    assert_eq!(err.user_message(), "Credenciales inválidas");
    assert!(!sessions.is_authenticated());
    assert!(!dir.path().join("storage.json").exists());
}

#[tokio::test]
async fn test_login_without_token_is_invalid_response() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"user": {"usuario": "ana"}})),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut sessions = SessionManager::restore(FileStore::in_dir(dir.path()));
    let err = sessions.login(&api(&server), "ana", "secreto").await.unwrap_err();
    assert!(matches!(
        err,
        GestorError::Session(SessionError::InvalidLoginResponse(_))
    ));
}

#[test]
fn test_logout_removes_both_keys() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::in_dir(dir.path());
    store
        .set(USER_KEY, &json!({"id": "u1", "usuario": "ana", "rol": "admin"}).to_string())
        .unwrap();
    store.set(TOKEN_KEY, "jwt-1").unwrap();

    let mut sessions = SessionManager::restore(store);
    assert_eq!(sessions.session().role(), Some(Role::Admin));
    sessions.logout();

    assert!(!sessions.is_authenticated());
    assert_eq!(sessions.store().get(USER_KEY).unwrap(), None);
    assert_eq!(sessions.store().get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn test_corrupt_user_restores_without_user() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::in_dir(dir.path());
    store.set(USER_KEY, "{not json").unwrap();
    store.set(TOKEN_KEY, "jwt-1").unwrap();

    let sessions = SessionManager::restore(store);
    assert!(sessions.session().user.is_none());
    assert!(sessions.is_authenticated());
    assert_eq!(sessions.session().role(), None);
}
