//! Shared fixtures for the integration tests.
//!
//! Each test starts its own `wiremock` server and talks to it through the
//! real reqwest adapter.
//!
//! ```ignore
//! let server = MockServer::start().await;
//! let ctx = context(&server, "admin");
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use gestor::adapters::ReqwestHttpClient;
use gestor::api::ApiClient;
use gestor::auth::Session;
use gestor::domain::StockThresholds;
use gestor::models::User;
use gestor::views::ViewContext;
use serde_json::{json, Value};
use wiremock::MockServer;

/// API prefix mounted on the mock server.
pub const API_PREFIX: &str = "/api";

pub fn api_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), API_PREFIX)
}

pub fn api(server: &MockServer) -> ApiClient<ReqwestHttpClient> {
    ApiClient::new(Arc::new(ReqwestHttpClient::new()), &api_url(server))
}

pub fn user(rol: &str) -> User {
    serde_json::from_value(json!({
        "_id": format!("u-{}", rol),
        "nombre": format!("Usuario {}", rol),
        "usuario": rol,
        "email": format!("{}@gestor.test", rol),
        "rol": rol,
    }))
    .unwrap()
}

/// Logged-in session whose token is `tok-<rol>`.
pub fn session(rol: &str) -> Session {
    Session::new(user(rol), format!("tok-{}", rol))
}

pub fn context(server: &MockServer, rol: &str) -> ViewContext<ReqwestHttpClient> {
    ViewContext::new(api(server), session(rol), StockThresholds::default())
}

pub fn anonymous_context(server: &MockServer) -> ViewContext<ReqwestHttpClient> {
    ViewContext::new(api(server), Session::default(), StockThresholds::default())
}

pub fn items_json() -> Value {
    json!([
        {"_id": "i1", "descripcion": "Multímetro", "categoria": "Medición", "cantidad": 6},
        {"_id": "i2", "descripcion": "Cable HDMI", "categoria": "Cables", "cantidad": "2"},
        {"id": 3, "descripcion": "Osciloscopio", "cantidad": 4, "minimo": 5, "critico": 4}
    ])
}

pub fn requests_json() -> Value {
    json!([
        {"_id": "r1", "tipo": "prestamo", "item": {"_id": "i1", "descripcion": "Multímetro"},
         "persona": "Ana", "cantidad": 1, "estado": "pendiente",
         "createdAt": "2025-05-02T10:00:00.000Z"},
        {"_id": "r2", "tipo": "baja", "item": "i2", "persona": "Luis", "cantidad": 1,
         "estado": "aprobada"}
    ])
}

pub fn loans_json() -> Value {
    json!([
        {"_id": "l1", "item": "i1", "persona": "Ana", "prestado": 2, "devuelto": 0,
         "fechaEntrega": "2025-05-01T09:00:00.000Z", "fechaVence": "2025-05-10"},
        {"_id": "l2", "item": {"_id": "i2", "descripcion": "Cable HDMI"}, "persona": "Luis",
         "prestado": 3, "devuelto": 3, "fechaVence": "2025-05-10T23:59:59.999Z"}
    ])
}

pub fn users_json() -> Value {
    json!([
        {"_id": "u-admin", "nombre": "Usuario admin", "usuario": "admin", "email": "admin@gestor.test", "rol": "admin"},
        {"_id": "u2", "nombre": "Luis", "usuario": "luis", "email": "luis@gestor.test", "rol": "encargado", "activo": false}
    ])
}
