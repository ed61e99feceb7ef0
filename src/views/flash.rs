//! Dismissible feedback banners.

use std::fmt;

use crate::api::ApiError;
use crate::error::GestorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Info => "info",
            FlashKind::Warning => "warning",
            FlashKind::Danger => "danger",
        }
    }
}

/// Outcome message of the last mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Danger, message)
    }

    /// Banner for a failed operation.
    ///
    /// Permission problems warn; everything else is danger. Server-provided
    /// messages are shown as given; transport and decode failures use
    /// `fallback`.
    pub fn from_error(err: &GestorError, fallback: &str) -> Self {
        match err {
            GestorError::Permission(e) => Self::warning(e.to_string()),
            _ => Self::danger(error_text(err, fallback)),
        }
    }
}

impl fmt::Display for Flash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Message for an error banner: the server's own message when there is
/// one, else `fallback`.
pub fn error_text(err: &GestorError, fallback: &str) -> String {
    match err {
        GestorError::Api(ApiError::Status { message, .. }) if !message.is_empty() => {
            message.clone()
        }
        GestorError::Api(_) => fallback.to_string(),
        other => other.user_message(),
    }
}

/// Flash plus load-error banner, both dismissible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feedback {
    flash: Option<Flash>,
    error: Option<String>,
}

impl Feedback {
    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_flash(&mut self, flash: Flash) {
        self.flash = Some(flash);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn dismiss_flash(&mut self) {
        self.flash = None;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Record a failed mutation and hand the error back.
    pub(crate) fn fail(&mut self, err: GestorError, fallback: &str) -> GestorError {
        tracing::debug!(code = err.error_code(), error = %err, "operation failed");
        self.flash = Some(Flash::from_error(&err, fallback));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PermissionError, ValidationError};
    use crate::traits::HttpError;
    use serde_json::Value;

    #[test]
    fn test_server_message_wins() {
        let err = GestorError::Api(ApiError::Status {
            status: 400,
            message: "Stock insuficiente".to_string(),
            data: Value::Null,
        });
        let flash = Flash::from_error(&err, "No se pudo guardar el ítem.");
        assert_eq!(flash, Flash::danger("Stock insuficiente"));
    }

    #[test]
    fn test_transport_uses_fallback() {
        let err = GestorError::Api(ApiError::Http(HttpError::ConnectionFailed("x".into())));
        let flash = Flash::from_error(&err, "No se pudo guardar el ítem.");
        assert_eq!(flash.message, "No se pudo guardar el ítem.");
        assert_eq!(flash.kind, FlashKind::Danger);
    }

    #[test]
    fn test_permission_warns_validation_dangers() {
        let err: GestorError = PermissionError::OwnAccount.into();
        assert_eq!(Flash::from_error(&err, "x").kind, FlashKind::Warning);
        let err: GestorError = ValidationError::new("descripcion", "Falta").into();
        assert_eq!(Flash::from_error(&err, "x"), Flash::danger("Falta"));
    }

    #[test]
    fn test_feedback_dismiss() {
        let mut feedback = Feedback::default();
        feedback.set_flash(Flash::success("ok"));
        feedback.set_error("boom");
        assert_eq!(feedback.flash().map(|f| f.kind), Some(FlashKind::Success));
        feedback.dismiss_flash();
        feedback.dismiss_error();
        assert_eq!(feedback, Feedback::default());
    }
}
