//! Session state and its persistence.
//!
//! The current user and bearer token live in memory and in a
//! [`LocalStore`] under [`USER_KEY`] and [`TOKEN_KEY`], so a session survives
//! restarts of the CLI.

use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::{GestorResult, SessionError, ValidationError};
use crate::models::{Role, User};
use crate::traits::{HttpClient, LocalStore, StorageError};

/// Store key of the session user, as JSON.
pub const USER_KEY: &str = "auth:user";

/// Store key of the bearer token.
pub const TOKEN_KEY: &str = "auth:token";

/// The signed-in user and token. Both `None` when logged out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            token: Some(token.into()),
        }
    }

    /// True when a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Role of the session; `None` unless authenticated with a known user.
    pub fn role(&self) -> Option<Role> {
        if !self.is_authenticated() {
            return None;
        }
        self.user.as_ref().map(|u| u.rol)
    }

    /// Login name of the session user.
    pub fn usuario(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.usuario.as_str())
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    usuario: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    user: User,
    token: String,
}

/// Owns the session and keeps the store in sync with it.
#[derive(Debug)]
pub struct SessionManager<S> {
    store: S,
    session: Session,
}

impl<S: LocalStore> SessionManager<S> {
    /// Load the persisted session.
    ///
    /// A stored user that is not valid JSON restores as no user. Store read
    /// failures are logged and treated as an empty store.
    pub fn restore(store: S) -> Self {
        let token = read_key(&store, TOKEN_KEY).filter(|t| !t.is_empty());
        let user = read_key(&store, USER_KEY).and_then(|raw| {
            serde_json::from_str::<Option<User>>(&raw)
                .map_err(|e| tracing::debug!(error = %e, "ignoring unreadable stored user"))
                .ok()
                .flatten()
        });
        Self {
            store,
            session: Session { user, token },
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Authenticate with `POST /auth/login` and persist the result.
    ///
    /// Blank credentials are rejected without a request. The login request
    /// never carries a previous token.
    pub async fn login<H: HttpClient>(
        &mut self,
        api: &ApiClient<H>,
        usuario: &str,
        password: &str,
    ) -> GestorResult<User> {
        let usuario = usuario.trim();
        if usuario.is_empty() || password.is_empty() {
            return Err(ValidationError::new("usuario", "Ingresa usuario y contraseña.").into());
        }

        let data = api
            .clone()
            .with_token(None)
            .post("/auth/login", &LoginBody { usuario, password })
            .await?;

        let LoginResponse { user, token } = serde_json::from_value(data)
            .map_err(|e| SessionError::InvalidLoginResponse(e.to_string()))?;
        if token.is_empty() {
            return Err(SessionError::InvalidLoginResponse("empty token".to_string()).into());
        }

        tracing::info!(usuario = %user.usuario, rol = %user.rol, "logged in");
        self.session = Session::new(user.clone(), token);
        self.persist();
        Ok(user)
    }

    /// Forget the session in memory and in the store.
    pub fn logout(&mut self) {
        if let Some(usuario) = self.session.usuario() {
            tracing::info!(usuario, "logged out");
        }
        self.session = Session::default();
        for key in [USER_KEY, TOKEN_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear stored session");
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }

    fn try_persist(&self) -> Result<(), StorageError> {
        let user = serde_json::to_string(&self.session.user)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(USER_KEY, &user)?;
        if let Some(ref token) = self.session.token {
            if let Err(e) = self.store.set(TOKEN_KEY, token) {
                // The old token must not stay paired with the new user.
                if let Err(remove_err) = self.store.remove(TOKEN_KEY) {
                    tracing::warn!(error = %remove_err, "failed to drop stale token");
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

fn read_key<S: LocalStore>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored session");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryStore, MockHttpClient, MockResponse};
    use crate::error::GestorError;
    use crate::traits::Method;
    use serde_json::json;
    use std::sync::Arc;

    const BASE: &str = "http://api.test/api";

    fn login_ok() -> MockResponse {
        MockResponse::json(
            200,
            json!({
                "user": {"_id": "u1", "nombre": "Ana", "usuario": "ana", "rol": "admin"},
                "token": "tok-1"
            }),
        )
    }

    #[test]
    fn test_restore_empty_store() {
        let manager = SessionManager::restore(InMemoryStore::new());
        assert!(!manager.is_authenticated());
        assert_eq!(manager.session().role(), None);
    }

    #[test]
    fn test_restore_corrupt_user_keeps_token() {
        let store = InMemoryStore::with_entries([(USER_KEY, "{not json"), (TOKEN_KEY, "t")]);
        let manager = SessionManager::restore(store);
        assert!(manager.is_authenticated());
        assert!(manager.session().user.is_none());
        assert_eq!(manager.session().role(), None);
    }

    #[test]
    fn test_role_requires_token() {
        let user: User = serde_json::from_value(json!({"id": 1, "rol": "admin"})).unwrap();
        let session = Session {
            user: Some(user),
            token: None,
        };
        assert_eq!(session.role(), None);
    }

    #[tokio::test]
    async fn test_login_persists_both_keys() {
        let mock = MockHttpClient::new();
        mock.set_response(Method::Post, &format!("{}/auth/login", BASE), login_ok());
        let api = ApiClient::new(Arc::new(mock.clone()), BASE).with_token(Some("old".into()));
        let store = InMemoryStore::new();
        let mut manager = SessionManager::restore(store.clone());

        let user = manager.login(&api, "  ana ", "pw").await.unwrap();
        assert_eq!(user.usuario, "ana");
        assert_eq!(manager.session().role(), Some(Role::Admin));
        assert_eq!(store.peek(TOKEN_KEY).as_deref(), Some("tok-1"));
        let stored: User = serde_json::from_str(&store.peek(USER_KEY).unwrap()).unwrap();
        assert_eq!(stored, user);

        let request = &mock.get_requests()[0];
        assert_eq!(request.json_body().unwrap(), json!({"usuario": "ana", "password": "pw"}));
        assert!(!request.headers.contains_key("Authorization"));
    }

    #[tokio::test]
    async fn test_login_blank_credentials_sends_nothing() {
        let mock = MockHttpClient::new();
        let api = ApiClient::new(Arc::new(mock.clone()), BASE);
        let mut manager = SessionManager::restore(InMemoryStore::new());

        let err = manager.login(&api, "   ", "pw").await.unwrap_err();
        assert_eq!(err.user_message(), "Ingresa usuario y contraseña.");
        let err = manager.login(&api, "ana", "").await.unwrap_err();
        assert!(matches!(err, GestorError::Validation(_)));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_login_rejected_keeps_logged_out() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(
            401,
            json!({"error": "Credenciales inválidas"}),
        ));
        let api = ApiClient::new(Arc::new(mock.clone()), BASE);
        let store = InMemoryStore::new();
        let mut manager = SessionManager::restore(store.clone());

        let err = manager.login(&api, "ana", "bad").await.unwrap_err();
        assert_eq!(err.user_message(), "Credenciales inválidas");
        assert!(!manager.is_authenticated());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_login_malformed_response() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(200, json!({"ok": true})));
        let api = ApiClient::new(Arc::new(mock.clone()), BASE);
        let mut manager = SessionManager::restore(InMemoryStore::new());

        let err = manager.login(&api, "ana", "pw").await.unwrap_err();
        assert!(matches!(
            err,
            GestorError::Session(SessionError::InvalidLoginResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_storage_failure_still_logs_in() {
        let mock = MockHttpClient::new();
        mock.set_default_response(login_ok());
        let api = ApiClient::new(Arc::new(mock.clone()), BASE);
        let store = InMemoryStore::new();
        store.set_write_should_fail(true);
        let mut manager = SessionManager::restore(store.clone());

        manager.login(&api, "ana", "pw").await.unwrap();
        assert!(manager.is_authenticated());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_failed_token_write_drops_previous_token() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(
            200,
            json!({
                "user": {"_id": "u2", "nombre": "Eva", "usuario": "eva", "rol": "invitado"},
                "token": "tok-2"
            }),
        ));
        let api = ApiClient::new(Arc::new(mock.clone()), BASE);
        let previous = json!({"_id": "u1", "usuario": "ana", "rol": "admin"}).to_string();
        let store = InMemoryStore::with_entries([(USER_KEY, previous.as_str()), (TOKEN_KEY, "tok-1")]);
        store.fail_sets_for(TOKEN_KEY);
        let mut manager = SessionManager::restore(store.clone());

        manager.login(&api, "eva", "pw").await.unwrap();
        assert_eq!(manager.session().token.as_deref(), Some("tok-2"));
        assert!(store.peek(TOKEN_KEY).is_none());

        let restored = SessionManager::restore(store);
        assert!(!restored.is_authenticated());
        assert_eq!(restored.session().role(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_store() {
        let mock = MockHttpClient::new();
        mock.set_default_response(login_ok());
        let api = ApiClient::new(Arc::new(mock.clone()), BASE);
        let store = InMemoryStore::new();
        let mut manager = SessionManager::restore(store.clone());
        manager.login(&api, "ana", "pw").await.unwrap();

        manager.logout();
        assert_eq!(manager.session(), &Session::default());
        assert!(store.peek(USER_KEY).is_none());
        assert!(store.peek(TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn test_restart_restores_session() {
        let mock = MockHttpClient::new();
        mock.set_default_response(login_ok());
        let api = ApiClient::new(Arc::new(mock.clone()), BASE);
        let store = InMemoryStore::new();
        SessionManager::restore(store.clone())
            .login(&api, "ana", "pw")
            .await
            .unwrap();

        let restored = SessionManager::restore(store);
        assert_eq!(restored.session().token.as_deref(), Some("tok-1"));
        assert_eq!(restored.session().usuario(), Some("ana"));
    }
}
