//! Error category classification.
//!
//! Categories drive how the CLI labels a failure and which hint it prints.
//! They never change behavior: nothing is retried automatically.

use std::fmt;

/// High-level categorization of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Backend unreachable (connection refused, DNS, timeout).
    Network,

    /// Missing session, rejected token, or insufficient role.
    Auth,

    /// Backend answered with a 5xx status.
    Server,

    /// Backend answered with something the client could not understand.
    Client,

    /// Invalid input or a request the backend rejected with a 4xx status.
    User,

    /// Local storage or OS failure.
    System,
}

impl ErrorCategory {
    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
        }
    }

    /// Suggested next step shown under an error banner.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Verifica que el servidor esté disponible e intenta de nuevo.",
            ErrorCategory::Auth => "Inicia sesión con un usuario que tenga los permisos necesarios.",
            ErrorCategory::Server => "El servidor tuvo un problema. Intenta más tarde.",
            ErrorCategory::Client => "Respuesta inesperada del servidor.",
            ErrorCategory::User => "Revisa los datos ingresados.",
            ErrorCategory::System => "Revisa los permisos del directorio de datos local.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
