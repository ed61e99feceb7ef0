//! Users (admin) view-model.

use super::context::ViewContext;
use super::flash::{error_text, Feedback, Flash};
use super::matches_filter;
use crate::error::{GestorError, GestorResult, PermissionError, ValidationError};
use crate::models::{NewUserPayload, Role, UpdateUserPayload, User};
use crate::traits::HttpClient;

/// User form. `usuario` is only used on create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub nombre: String,
    pub usuario: String,
    pub email: String,
    pub rol: Role,
    pub activo: bool,
    pub password: String,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            nombre: String::new(),
            usuario: String::new(),
            email: String::new(),
            rol: Role::Invitado,
            activo: true,
            password: String::new(),
        }
    }
}

impl UserForm {
    /// Form prefilled from an existing user; the password starts blank.
    pub fn from_user(user: &User) -> Self {
        Self {
            nombre: user.nombre.clone(),
            usuario: user.usuario.clone(),
            email: user.email.clone(),
            rol: user.rol,
            activo: user.activo,
            password: String::new(),
        }
    }

    pub fn validate_create(&self) -> Result<NewUserPayload, ValidationError> {
        let nombre = required("nombre", &self.nombre, "El nombre es obligatorio.")?;
        let usuario = required("usuario", &self.usuario, "El usuario es obligatorio.")?;
        let email = required("email", &self.email, "El email es obligatorio.")?;
        let password = required("password", &self.password, "La contraseña es obligatoria.")?;
        Ok(NewUserPayload {
            nombre,
            usuario,
            email,
            password,
            rol: self.rol,
            activo: self.activo,
        })
    }

    /// A blank password leaves the current one unchanged.
    pub fn validate_update(&self) -> Result<UpdateUserPayload, ValidationError> {
        let nombre = required("nombre", &self.nombre, "El nombre es obligatorio.")?;
        let email = required("email", &self.email, "El email es obligatorio.")?;
        let password = Some(self.password.trim())
            .filter(|p| !p.is_empty())
            .map(String::from);
        Ok(UpdateUserPayload {
            nombre,
            email,
            rol: self.rol,
            activo: self.activo,
            password,
        })
    }
}

fn required(field: &'static str, raw: &str, message: &str) -> Result<String, ValidationError> {
    match raw.trim() {
        "" => Err(ValidationError::new(field, message)),
        v => Ok(v.to_string()),
    }
}

#[derive(Debug)]
pub struct UsersView<H> {
    ctx: ViewContext<H>,
    users: Vec<User>,
    filter: String,
    feedback: Feedback,
}

impl<H: HttpClient> UsersView<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        Self {
            ctx,
            users: Vec::new(),
            filter: String::new(),
            feedback: Feedback::default(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut Feedback {
        &mut self.feedback
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// Users matching the filter on nombre, usuario, rol or email.
    pub fn filtered(&self) -> Vec<&User> {
        self.users
            .iter()
            .filter(|u| {
                matches_filter(
                    &self.filter,
                    &[
                        u.nombre.as_str(),
                        u.usuario.as_str(),
                        u.rol.as_str(),
                        u.email.as_str(),
                    ],
                )
            })
            .collect()
    }

    /// `GET /users`. Non-admin sessions get an access error and no request.
    pub async fn load(&mut self) -> GestorResult<()> {
        self.feedback.dismiss_error();
        if !self.ctx.is_admin() {
            let err = GestorError::from(PermissionError::Restricted);
            self.feedback.set_error(err.user_message());
            return Err(err);
        }
        match self.ctx.api.get::<Vec<User>>("/users").await {
            Ok(users) => {
                tracing::debug!(count = users.len(), "users loaded");
                self.users = users;
                Ok(())
            }
            Err(e) => {
                let err = GestorError::from(e);
                self.feedback
                    .set_error(error_text(&err, "Error al cargar usuarios."));
                Err(err)
            }
        }
    }

    pub async fn create(&mut self, form: &UserForm) -> GestorResult<()> {
        const FALLBACK: &str = "No se pudo guardar el usuario.";
        self.feedback.dismiss_flash();
        if let Err(e) = self.ensure_admin() {
            return Err(self.feedback.fail(e, FALLBACK));
        }
        let payload = match form.validate_create() {
            Ok(p) => p,
            Err(e) => return Err(self.feedback.fail(e.into(), FALLBACK)),
        };
        if let Err(e) = self.ctx.api.post("/users", &payload).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(usuario = %payload.usuario, rol = %payload.rol, "user created");
        self.feedback
            .set_flash(Flash::success("Usuario creado correctamente."));
        self.reload().await;
        Ok(())
    }

    pub async fn update(&mut self, id: &str, form: &UserForm) -> GestorResult<()> {
        const FALLBACK: &str = "No se pudo guardar el usuario.";
        self.feedback.dismiss_flash();
        if let Err(e) = self.ensure_admin() {
            return Err(self.feedback.fail(e, FALLBACK));
        }
        let payload = match form.validate_update() {
            Ok(p) => p,
            Err(e) => return Err(self.feedback.fail(e.into(), FALLBACK)),
        };
        if let Err(e) = self.ctx.api.put(&format!("/users/{}", id), &payload).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(id, password_changed = payload.password.is_some(), "user updated");
        self.feedback
            .set_flash(Flash::success("Usuario actualizado correctamente."));
        self.reload().await;
        Ok(())
    }

    /// Delete user `id`. Deleting the signed-in account is refused with a
    /// warning before any request.
    pub async fn delete(&mut self, id: &str) -> GestorResult<()> {
        const FALLBACK: &str = "No se pudo eliminar el usuario.";
        self.feedback.dismiss_flash();
        if let Err(e) = self.ensure_admin() {
            return Err(self.feedback.fail(e, FALLBACK));
        }
        if self.is_own_account(id) {
            return Err(self.feedback.fail(PermissionError::OwnAccount.into(), FALLBACK));
        }
        if let Err(e) = self.ctx.api.delete(&format!("/users/{}", id)).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(id, "user deleted");
        self.feedback.set_flash(Flash::info("Usuario eliminado."));
        self.reload().await;
        Ok(())
    }

    /// True when `id` is the session user, by id or by login name.
    fn is_own_account(&self, id: &str) -> bool {
        let Some(me) = self.ctx.session.user.as_ref() else {
            return false;
        };
        if !me.id.is_empty() && me.id == id {
            return true;
        }
        self.user(id).is_some_and(|u| u.usuario == me.usuario)
    }

    fn ensure_admin(&self) -> GestorResult<()> {
        Ok(self.ctx.require_admin("gestionar usuarios")?)
    }

    async fn reload(&mut self) {
        if let Err(e) = self.load().await {
            tracing::debug!(error = %e, "reload after mutation failed");
        }
    }
}
