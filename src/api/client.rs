//! JSON REST client for the Gestor backend.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::error::{error_message, ApiError};
use crate::traits::{Headers, HttpClient, Method, Response};

/// Default base URL of the REST API.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Client for the Gestor REST API.
///
/// Every request carries `Content-Type: application/json`, plus
/// `Authorization: Bearer <token>` when a token is set. Non-2xx responses
/// become [`ApiError::Status`] with the server-provided message.
#[derive(Debug)]
pub struct ApiClient<H> {
    base_url: String,
    http: Arc<H>,
    token: Option<String>,
}

impl<H> Clone for ApiClient<H> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            http: Arc::clone(&self.http),
            token: self.token.clone(),
        }
    }
}

impl<H: HttpClient> ApiClient<H> {
    /// Create a client for `base_url`; a trailing `/` is dropped.
    pub fn new(http: Arc<H>, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            token: None,
        }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the bearer token on an existing client.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying transport.
    pub fn http(&self) -> &Arc<H> {
        &self.http
    }

    /// Absolute URL for an API path; a missing leading `/` is added.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(ref token) = self.token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    /// Send a request and return the parsed body.
    ///
    /// An empty body parses as `null`; a body that is not JSON is returned
    /// as a JSON string.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        let encoded = body.map(|b| b.to_string());

        let response = self
            .http
            .send(method, &url, encoded.as_deref(), &self.headers())
            .await
            .map_err(|e| {
                tracing::debug!(%method, path, error = %e, "api request failed");
                ApiError::Http(e)
            })?;

        tracing::debug!(%method, path, status = response.status, "api request");

        let data = parse_body(&response);
        if !response.is_success() {
            let message = error_message(response.status, &data);
            return Err(ApiError::Status {
                status: response.status,
                message,
                data,
            });
        }
        Ok(data)
    }

    /// `GET path`, decoded into `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let data = self.request(Method::Get, path, None).await?;
        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `POST path` with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode(body)?;
        self.request(Method::Post, path, Some(&body)).await
    }

    /// `PUT path` with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode(body)?;
        self.request(Method::Put, path, Some(&body)).await
    }

    /// `PATCH path` with a JSON body.
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode(body)?;
        self.request(Method::Patch, path, Some(&body)).await
    }

    /// `DELETE path`.
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::Delete, path, None).await
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}

fn parse_body(response: &Response) -> Value {
    if response.body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&response.body).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&response.body).into_owned())
    })
}
