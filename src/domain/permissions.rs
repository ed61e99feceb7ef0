//! Role gates. `None` means no authenticated session.

use crate::models::Role;

/// Create, edit and state changes: admin or encargado.
pub fn can_manage(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Admin) | Some(Role::Encargado))
}

/// Deletions: admin only.
pub fn can_delete(role: Option<Role>) -> bool {
    is_admin(role)
}

pub fn is_admin(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Admin))
}
