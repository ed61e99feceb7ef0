//! HTTP client trait abstraction.
//!
//! Provides a trait-based abstraction for HTTP operations, enabling
//! dependency injection and mocking in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// HTTP methods used by the REST backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status and raw body of a response. Headers are not needed by the
/// API client and are dropped.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self { status, body }
    }

    /// Response whose body is `value` serialized.
    pub fn json_value(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, Bytes::from(value.to_string()))
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level HTTP failures. Non-2xx statuses are not errors here.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("No se pudo conectar con el servidor: {0}")]
    ConnectionFailed(String),

    #[error("El servidor no respondió a tiempo: {0}")]
    Timeout(String),

    #[error("URL inválida: {0}")]
    InvalidUrl(String),

    /// The body could not be read.
    #[error("Error leyendo la respuesta: {0}")]
    Io(String),

    #[error("Error HTTP: {0}")]
    Other(String),
}

/// Trait for HTTP client operations.
///
/// Implementations include the production reqwest-based client and the
/// recording mock used in tests.
///
/// # Example
///
/// ```ignore
/// use gestor::traits::{HttpClient, Headers, Method};
///
/// async fn ping<C: HttpClient>(client: &C) -> bool {
///     client
///         .send(Method::Get, "http://localhost:3000/api/items", None, &Headers::new())
///         .await
///         .map(|r| r.is_success())
///         .unwrap_or(false)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request and return the raw response.
    ///
    /// Any status code is returned as `Ok`; only transport failures
    /// produce an `HttpError`.
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
        headers: &Headers,
    ) -> Result<Response, HttpError>;
}
