//! The single error type raised at the API-client boundary.

use serde_json::Value;

use crate::traits::HttpError;

/// Error type for REST API calls.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    Http(HttpError),
    /// The backend answered with a non-2xx status.
    Status {
        status: u16,
        /// Server-provided message, or `Error <status>`.
        message: String,
        /// Parsed response body (JSON, or a JSON string for plain text).
        data: Value,
    },
    /// The request body could not be serialized.
    Encode(String),
    /// A 2xx body did not match the expected shape.
    Decode(String),
}

impl ApiError {
    /// HTTP status of the failure; 0 when no status was received.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Status { status, .. } => *status,
            _ => 0,
        }
    }

    /// Parsed error body, if the backend sent one.
    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiError::Status { data, .. } if !data.is_null() => Some(data),
            _ => None,
        }
    }

    /// Message suitable for a banner.
    pub fn message(&self) -> String {
        match self {
            ApiError::Http(e) => e.to_string(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Encode(msg) => format!("No se pudo preparar la solicitud: {}", msg),
            ApiError::Decode(msg) => format!("Respuesta inesperada del servidor: {}", msg),
        }
    }

    /// Whether the backend rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), 401 | 403)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http(e) => write!(f, "HTTP error: {}", e),
            ApiError::Status { status, message, .. } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            ApiError::Encode(msg) => write!(f, "Encode error: {}", msg),
            ApiError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        ApiError::Http(e)
    }
}

/// Pick the banner message out of an error body.
///
/// Order: `error`, then `message`, then `Error <status>`.
pub fn error_message(status: u16, data: &Value) -> String {
    ["error", "message"]
        .iter()
        .filter_map(|key| data.get(key))
        .filter_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Null | Value::String(_) | Value::Bool(false) => None,
            other => Some(other.to_string()),
        })
        .next()
        .unwrap_or_else(|| format!("Error {}", status))
}
