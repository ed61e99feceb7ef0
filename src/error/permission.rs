//! Role-gating errors raised before a request is sent.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// The action needs an admin or encargado session.
    #[error("Solo admin/encargado autenticados pueden {action}.")]
    ManageRequired { action: &'static str },

    /// The action needs an admin session.
    #[error("Solo admin puede {action}.")]
    AdminRequired { action: &'static str },

    /// The section is only visible to admins.
    #[error("Acceso restringido. Esta sección solo está disponible para administradores.")]
    Restricted,

    /// An admin tried to delete the account they are logged in with.
    #[error("No puedes eliminar tu propio usuario mientras estás conectado.")]
    OwnAccount,
}
