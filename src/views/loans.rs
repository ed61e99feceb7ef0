//! Loans (préstamos) view-model with partial returns.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

use super::context::ViewContext;
use super::flash::{error_text, Feedback, Flash};
use super::matches_filter;
use crate::domain::{clamp_return, format_due_date, LoanStatus};
use crate::error::{parse_positive, GestorError, GestorResult, ValidationError};
use crate::models::{Item, Loan, LoanPayload, ReturnPayload};
use crate::traits::HttpClient;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanForm {
    /// Item id.
    pub item: String,
    pub persona: String,
    pub prestado: String,
    /// Due date as `YYYY-MM-DD`.
    pub fecha_vence: String,
    pub observacion: String,
}

impl LoanForm {
    /// Check the form and build the `POST /loans` body. The due date is
    /// sent as the end of that day in UTC.
    pub fn validate(&self) -> Result<LoanPayload, ValidationError> {
        let item = self.item.trim();
        if item.is_empty() {
            return Err(ValidationError::new("item", "Debes seleccionar un equipo."));
        }
        let persona = self.persona.trim();
        if persona.is_empty() {
            return Err(ValidationError::new(
                "persona",
                "Debes indicar la persona que retira el equipo.",
            ));
        }
        let prestado = parse_positive(
            "prestado",
            "La cantidad prestada debe ser un número mayor a 0.",
            &self.prestado,
        )?;
        let fecha = self.fecha_vence.trim();
        if fecha.is_empty() {
            return Err(ValidationError::new(
                "fechaVence",
                "Debes indicar la fecha de devolución comprometida.",
            ));
        }
        let date = NaiveDate::parse_from_str(fecha, "%Y-%m-%d").map_err(|_| {
            ValidationError::new(
                "fechaVence",
                "La fecha de devolución debe tener el formato AAAA-MM-DD.",
            )
        })?;

        Ok(LoanPayload {
            item: item.to_string(),
            persona: persona.to_string(),
            prestado,
            fecha_vence: format_due_date(date),
            observacion: self.observacion.trim().to_string(),
        })
    }
}

/// Result of a return attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// `cantidad` was submitted; `clamped` when the entry exceeded pendiente.
    Registered { cantidad: u32, clamped: bool },
    /// Nothing left to return; no request was sent.
    NothingPending,
    /// Blank entry; no request was sent.
    Cancelled,
}

/// A loan with its derived values, as shown in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanRow<'a> {
    pub loan: &'a Loan,
    pub item_nombre: &'a str,
    pub pendiente: u32,
    pub status: LoanStatus,
}

#[derive(Debug)]
pub struct LoansView<H> {
    ctx: ViewContext<H>,
    loans: Vec<Loan>,
    items: HashMap<String, Item>,
    filter: String,
    feedback: Feedback,
}

impl<H: HttpClient> LoansView<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        Self {
            ctx,
            loans: Vec::new(),
            items: HashMap::new(),
            filter: String::new(),
            feedback: Feedback::default(),
        }
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn loan(&self, id: &str) -> Option<&Loan> {
        self.loans.iter().find(|l| l.id == id)
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

    /// Rows with status evaluated at `now`.
    pub fn rows(&self, now: DateTime<Utc>) -> Vec<LoanRow<'_>> {
        self.loans.iter().map(|l| self.row(l, now)).collect()
    }

    /// Rows matching the filter on persona, item name or status label.
    pub fn filtered(&self, now: DateTime<Utc>) -> Vec<LoanRow<'_>> {
        self.rows(now)
            .into_iter()
            .filter(|r| {
                matches_filter(
                    &self.filter,
                    &[r.loan.persona.as_str(), r.item_nombre, r.status.label()],
                )
            })
            .collect()
    }

    fn row<'a>(&'a self, loan: &'a Loan, now: DateTime<Utc>) -> LoanRow<'a> {
        LoanRow {
            loan,
            item_nombre: loan.item_name(&self.items),
            pendiente: loan.pendiente(),
            status: loan.status(now),
        }
    }

    /// Fetch items and loans concurrently, replacing both.
    pub async fn load(&mut self) -> GestorResult<()> {
        self.feedback.dismiss_error();
        let api = &self.ctx.api;
        let result = futures::try_join!(
            api.get::<Vec<Item>>("/items"),
            api.get::<Vec<Loan>>("/loans"),
        );
        match result {
            Ok((items, loans)) => {
                tracing::debug!(count = loans.len(), "loans loaded");
                self.items = items.into_iter().map(|i| (i.id.clone(), i)).collect();
                self.loans = loans;
                Ok(())
            }
            Err(e) => {
                let err = GestorError::from(e);
                self.feedback
                    .set_error(error_text(&err, "Error al cargar préstamos."));
                Err(err)
            }
        }
    }

    pub async fn create(&mut self, form: &LoanForm) -> GestorResult<()> {
        const FALLBACK: &str = "No se pudo registrar el préstamo.";
        self.feedback.dismiss_flash();
        let payload = match self.prepare(form) {
            Ok(p) => p,
            Err(e) => return Err(self.feedback.fail(e, FALLBACK)),
        };
        if let Err(e) = self.ctx.api.post("/loans", &payload).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(item = %payload.item, prestado = payload.prestado, "loan created");
        self.feedback
            .set_flash(Flash::success("Préstamo registrado correctamente."));
        self.reload().await;
        Ok(())
    }

    /// Register a partial return of loan `id` from a typed `entry`.
    ///
    /// The loan must be loaded. A blank entry cancels; an entry above the
    /// pending amount is reduced to it before sending.
    pub async fn register_return(&mut self, id: &str, entry: &str) -> GestorResult<ReturnOutcome> {
        const FALLBACK: &str = "No se pudo registrar la devolución.";
        self.feedback.dismiss_flash();
        if let Err(e) = self
            .ctx
            .require_manage("registrar préstamos o devoluciones")
        {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        let pendiente = match self.loan(id) {
            Some(loan) => loan.pendiente(),
            None => {
                let err = ValidationError::new("id", "Préstamo no encontrado.").into();
                return Err(self.feedback.fail(err, FALLBACK));
            }
        };
        if pendiente == 0 {
            self.feedback.set_flash(Flash::info(
                "Este préstamo ya está completamente devuelto.",
            ));
            return Ok(ReturnOutcome::NothingPending);
        }
        if entry.trim().is_empty() {
            return Ok(ReturnOutcome::Cancelled);
        }
        let requested = match parse_positive("cantidad", "Debes ingresar una cantidad válida.", entry)
        {
            Ok(n) => n,
            Err(e) => return Err(self.feedback.fail(e.into(), FALLBACK)),
        };
        let cantidad = clamp_return(requested, pendiente);
        let clamped = cantidad < requested;
        if clamped {
            tracing::warn!(id, requested, pendiente, "return amount reduced to pending");
        }

        let path = format!("/loans/{}/return", id);
        if let Err(e) = self.ctx.api.patch(&path, &ReturnPayload { cantidad }).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(id, cantidad, "return registered");
        self.feedback.set_flash(Flash::success("Devolución registrada."));
        self.reload().await;
        Ok(ReturnOutcome::Registered { cantidad, clamped })
    }

    pub async fn delete(&mut self, id: &str) -> GestorResult<()> {
        const FALLBACK: &str = "No se pudo eliminar el préstamo.";
        self.feedback.dismiss_flash();
        if let Err(e) = self.ctx.require_admin("eliminar préstamos") {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        if let Err(e) = self.ctx.api.delete(&format!("/loans/{}", id)).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(id, "loan deleted");
        self.feedback.set_flash(Flash::info("Préstamo eliminado."));
        self.reload().await;
        Ok(())
    }

    fn prepare(&self, form: &LoanForm) -> GestorResult<LoanPayload> {
        self.ctx
            .require_manage("registrar préstamos o devoluciones")?;
        Ok(form.validate()?)
    }

    async fn reload(&mut self) {
        if let Err(e) = self.load().await {
            tracing::debug!(error = %e, "reload after mutation failed");
        }
    }
}
