//! Result type alias for Gestor operations.

use super::gestor_error::GestorError;

/// Type alias for Results using GestorError.
pub type GestorResult<T> = Result<T, GestorError>;
