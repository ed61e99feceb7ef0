//! Unified error type for the Gestor client.

use std::fmt;

use super::category::ErrorCategory;
use super::permission::PermissionError;
use super::session::SessionError;
use super::validation::ValidationError;
use crate::api::ApiError;

/// Unified error type returned by view-model and session operations.
#[derive(Debug, Clone)]
pub enum GestorError {
    /// The REST call failed.
    Api(ApiError),

    /// A form was rejected before sending.
    Validation(ValidationError),

    /// The session's role does not allow the action.
    Permission(PermissionError),

    /// Session persistence failed.
    Session(SessionError),
}

impl GestorError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GestorError::Api(err) => match err {
                ApiError::Http(_) => ErrorCategory::Network,
                ApiError::Status { status, .. } => match status {
                    401 | 403 => ErrorCategory::Auth,
                    400..=499 => ErrorCategory::User,
                    _ => ErrorCategory::Server,
                },
                ApiError::Encode(_) | ApiError::Decode(_) => ErrorCategory::Client,
            },
            GestorError::Validation(_) => ErrorCategory::User,
            GestorError::Permission(_) => ErrorCategory::Auth,
            GestorError::Session(SessionError::Storage(_)) => ErrorCategory::System,
            GestorError::Session(SessionError::InvalidLoginResponse(_)) => ErrorCategory::Client,
        }
    }

    /// Message for the banner: the server message, the validation text, or
    /// the permission warning.
    pub fn user_message(&self) -> String {
        match self {
            GestorError::Api(err) => err.message(),
            GestorError::Validation(err) => err.to_string(),
            GestorError::Permission(err) => err.to_string(),
            GestorError::Session(err) => err.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            GestorError::Api(ApiError::Http(_)) => "api_transport",
            GestorError::Api(ApiError::Status { .. }) => "api_status",
            GestorError::Api(ApiError::Encode(_)) => "api_encode",
            GestorError::Api(ApiError::Decode(_)) => "api_decode",
            GestorError::Validation(_) => "validation",
            GestorError::Permission(_) => "permission",
            GestorError::Session(_) => "session",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }

    /// Whether this error was raised locally, before any request.
    pub fn is_client_side(&self) -> bool {
        matches!(self, GestorError::Validation(_) | GestorError::Permission(_))
    }
}

impl fmt::Display for GestorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestorError::Api(err) => write!(f, "{}", err),
            GestorError::Validation(err) => write!(f, "{}", err),
            GestorError::Permission(err) => write!(f, "{}", err),
            GestorError::Session(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GestorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GestorError::Api(err) => Some(err),
            GestorError::Validation(err) => Some(err),
            GestorError::Permission(err) => Some(err),
            GestorError::Session(err) => Some(err),
        }
    }
}

impl From<ApiError> for GestorError {
    fn from(err: ApiError) -> Self {
        GestorError::Api(err)
    }
}

impl From<ValidationError> for GestorError {
    fn from(err: ValidationError) -> Self {
        GestorError::Validation(err)
    }
}

impl From<PermissionError> for GestorError {
    fn from(err: PermissionError) -> Self {
        GestorError::Permission(err)
    }
}

impl From<SessionError> for GestorError {
    fn from(err: SessionError) -> Self {
        GestorError::Session(err)
    }
}
