//! Requests (solicitudes) view-model.
//!
//! Status changes are not checked against a state machine: any status can be
//! set from any other and the server decides whether to accept it.

use std::collections::HashMap;

use super::context::ViewContext;
use super::flash::{error_text, Feedback, Flash};
use super::matches_filter;
use crate::error::{parse_positive, GestorError, GestorResult, ValidationError};
use crate::models::{
    Item, LoanRequest, RequestKind, RequestPayload, RequestStatus, StatusPayload, UNKNOWN_ITEM,
};
use crate::traits::HttpClient;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestForm {
    pub tipo: String,
    /// Item id.
    pub item: String,
    pub persona: String,
    pub cantidad: String,
    pub observacion: String,
}

impl RequestForm {
    /// Check the form and build the body of a new, pending request.
    pub fn validate(&self) -> Result<RequestPayload, ValidationError> {
        let tipo: RequestKind = self
            .tipo
            .parse()
            .map_err(|_| ValidationError::new("tipo", "Debes seleccionar un tipo de solicitud."))?;
        let item = self.item.trim();
        if item.is_empty() {
            return Err(ValidationError::new("item", "Debes seleccionar un equipo."));
        }
        let persona = self.persona.trim();
        if persona.is_empty() {
            return Err(ValidationError::new(
                "persona",
                "Debes indicar la persona solicitante.",
            ));
        }
        let cantidad = parse_positive(
            "cantidad",
            "La cantidad debe ser un número mayor a 0.",
            &self.cantidad,
        )?;

        Ok(RequestPayload {
            tipo,
            item: item.to_string(),
            persona: persona.to_string(),
            cantidad,
            observacion: self.observacion.trim().to_string(),
            estado: RequestStatus::Pendiente,
        })
    }
}

#[derive(Debug)]
pub struct RequestsView<H> {
    ctx: ViewContext<H>,
    requests: Vec<LoanRequest>,
    items: HashMap<String, Item>,
    filter: String,
    feedback: Feedback,
}

impl<H: HttpClient> RequestsView<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        Self {
            ctx,
            requests: Vec::new(),
            items: HashMap::new(),
            filter: String::new(),
            feedback: Feedback::default(),
        }
    }

    pub fn requests(&self) -> &[LoanRequest] {
        &self.requests
    }

    pub fn request(&self, id: &str) -> Option<&LoanRequest> {
        self.requests.iter().find(|r| r.id == id)
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

    /// Name of the requested item.
    pub fn item_name<'a>(&'a self, request: &'a LoanRequest) -> &'a str {
        if let Some(ref nombre) = request.item_nombre {
            return nombre;
        }
        self.items
            .get(&request.item)
            .map(|i| i.descripcion.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or(UNKNOWN_ITEM)
    }

    /// Requests matching the filter on persona, item, tipo or estado.
    pub fn filtered(&self) -> Vec<&LoanRequest> {
        self.requests
            .iter()
            .filter(|r| {
                matches_filter(
                    &self.filter,
                    &[
                        r.persona.as_str(),
                        self.item_name(r),
                        r.tipo.map(|t| t.as_str()).unwrap_or(""),
                        r.estado.as_str(),
                    ],
                )
            })
            .collect()
    }

    /// Fetch items and requests concurrently, replacing both.
    pub async fn load(&mut self) -> GestorResult<()> {
        self.feedback.dismiss_error();
        let api = &self.ctx.api;
        let result = futures::try_join!(
            api.get::<Vec<Item>>("/items"),
            api.get::<Vec<LoanRequest>>("/requests"),
        );
        match result {
            Ok((items, requests)) => {
                tracing::debug!(count = requests.len(), "requests loaded");
                self.items = items.into_iter().map(|i| (i.id.clone(), i)).collect();
                self.requests = requests;
                Ok(())
            }
            Err(e) => {
                let err = GestorError::from(e);
                self.feedback
                    .set_error(error_text(&err, "Error al cargar solicitudes."));
                Err(err)
            }
        }
    }

    pub async fn create(&mut self, form: &RequestForm) -> GestorResult<()> {
        const FALLBACK: &str = "No se pudo registrar la solicitud.";
        self.feedback.dismiss_flash();
        let payload = match self.prepare(form) {
            Ok(p) => p,
            Err(e) => return Err(self.feedback.fail(e, FALLBACK)),
        };
        if let Err(e) = self.ctx.api.post("/requests", &payload).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(tipo = %payload.tipo, persona = %payload.persona, "request created");
        self.feedback
            .set_flash(Flash::success("Solicitud registrada correctamente."));
        self.reload().await;
        Ok(())
    }

    /// `PATCH /requests/:id/status`, from whatever the current status is.
    pub async fn set_status(&mut self, id: &str, estado: RequestStatus) -> GestorResult<()> {
        const FALLBACK: &str = "No se pudo actualizar la solicitud.";
        self.feedback.dismiss_flash();
        if let Err(e) = self.ctx.require_manage("cambiar el estado de solicitudes") {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        let path = format!("/requests/{}/status", id);
        if let Err(e) = self.ctx.api.patch(&path, &StatusPayload { estado }).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(id, %estado, "request status changed");
        self.feedback.set_flash(Flash::success(format!(
            "Solicitud marcada como {}.",
            estado.as_str()
        )));
        self.reload().await;
        Ok(())
    }

    pub async fn approve(&mut self, id: &str) -> GestorResult<()> {
        self.set_status(id, RequestStatus::Aprobada).await
    }

    pub async fn reject(&mut self, id: &str) -> GestorResult<()> {
        self.set_status(id, RequestStatus::Rechazada).await
    }

    pub async fn complete(&mut self, id: &str) -> GestorResult<()> {
        self.set_status(id, RequestStatus::Completa).await
    }

    pub async fn delete(&mut self, id: &str) -> GestorResult<()> {
        const FALLBACK: &str = "No se pudo eliminar la solicitud.";
        self.feedback.dismiss_flash();
        if let Err(e) = self.ctx.require_admin("eliminar solicitudes") {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        if let Err(e) = self.ctx.api.delete(&format!("/requests/{}", id)).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(id, "request deleted");
        self.feedback.set_flash(Flash::info("Solicitud eliminada."));
        self.reload().await;
        Ok(())
    }

    fn prepare(&self, form: &RequestForm) -> GestorResult<RequestPayload> {
        self.ctx.require_manage("registrar solicitudes")?;
        Ok(form.validate()?)
    }

    async fn reload(&mut self) {
        if let Err(e) = self.load().await {
            tracing::debug!(error = %e, "reload after mutation failed");
        }
    }
}
