//! Session persistence and login-response errors.

use thiserror::Error;

use crate::traits::StorageError;

#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The persisted store could not be opened.
    #[error("No se pudo abrir el almacenamiento local: {0}")]
    Storage(#[from] StorageError),

    /// The login endpoint answered 2xx without a usable user/token.
    #[error("Respuesta de inicio de sesión inválida: {0}")]
    InvalidLoginResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error() {
        let err: SessionError = StorageError::Unavailable("no home".to_string()).into();
        assert!(matches!(err, SessionError::Storage(_)));
        assert!(err.to_string().contains("no home"));
    }
}
