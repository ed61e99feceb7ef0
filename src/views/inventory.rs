//! Inventory (items) view-model.

use super::context::ViewContext;
use super::flash::{error_text, Feedback, Flash};
use super::matches_filter;
use crate::domain::{has_alerts, StockLevel, StockThresholds};
use crate::error::{parse_non_negative, GestorError, GestorResult, ValidationError};
use crate::models::{Item, ItemPayload, DEFAULT_RESPONSABLE};
use crate::traits::HttpClient;

/// Item form as typed by the user. Numeric fields are raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub descripcion: String,
    pub categoria: String,
    pub cantidad: String,
    pub minimo: String,
    pub critico: String,
    pub responsable: String,
    pub observacion: String,
}

impl ItemForm {
    /// Form prefilled from an existing item, for editing.
    pub fn from_item(item: &Item) -> Self {
        Self {
            descripcion: item.descripcion.clone(),
            categoria: item.categoria.clone(),
            cantidad: item.cantidad.to_string(),
            minimo: item.minimo.map(|n| n.to_string()).unwrap_or_default(),
            critico: item.critico.map(|n| n.to_string()).unwrap_or_default(),
            responsable: item.responsable.clone(),
            observacion: item.observacion.clone(),
        }
    }

    /// Check the form and build the request body.
    ///
    /// Blank quantity is 0, blank thresholds take `defaults`, and a blank
    /// responsable becomes [`DEFAULT_RESPONSABLE`].
    pub fn validate(&self, defaults: StockThresholds) -> Result<ItemPayload, ValidationError> {
        let descripcion = self.descripcion.trim();
        if descripcion.is_empty() {
            return Err(ValidationError::new(
                "descripcion",
                "La descripción es obligatoria.",
            ));
        }
        let cantidad = parse_non_negative("cantidad", "La cantidad", &self.cantidad)?.unwrap_or(0);
        let minimo =
            parse_non_negative("minimo", "El mínimo", &self.minimo)?.unwrap_or(defaults.bajo);
        let critico =
            parse_non_negative("critico", "El crítico", &self.critico)?.unwrap_or(defaults.critico);
        let responsable = match self.responsable.trim() {
            "" => DEFAULT_RESPONSABLE,
            r => r,
        };

        Ok(ItemPayload {
            descripcion: descripcion.to_string(),
            categoria: self.categoria.trim().to_string(),
            cantidad,
            minimo,
            critico,
            responsable: responsable.to_string(),
            observacion: self.observacion.trim().to_string(),
        })
    }
}

/// Items list with CRUD and stock classification.
#[derive(Debug)]
pub struct InventoryView<H> {
    ctx: ViewContext<H>,
    items: Vec<Item>,
    filter: String,
    feedback: Feedback,
}

impl<H: HttpClient> InventoryView<H> {
    pub fn new(ctx: ViewContext<H>) -> Self {
        Self {
            ctx,
            items: Vec::new(),
            filter: String::new(),
            feedback: Feedback::default(),
        }
    }

    pub fn context(&self) -> &ViewContext<H> {
        &self.ctx
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
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

    /// Stock level of `item`, computed now.
    pub fn level(&self, item: &Item) -> StockLevel {
        item.stock_level(self.ctx.thresholds)
    }

    /// True when any loaded item is BAJO or CRÍTICO.
    pub fn has_alerts(&self) -> bool {
        has_alerts(self.items.iter().map(|i| self.level(i)))
    }

    /// Items matching the filter on descripcion, categoria or responsable.
    pub fn filtered(&self) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|i| {
                matches_filter(
                    &self.filter,
                    &[
                        i.descripcion.as_str(),
                        i.categoria.as_str(),
                        i.responsable.as_str(),
                    ],
                )
            })
            .collect()
    }

    /// `GET /items`, replacing the list.
    pub async fn load(&mut self) -> GestorResult<()> {
        self.feedback.dismiss_error();
        match self.ctx.api.get::<Vec<Item>>("/items").await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "items loaded");
                self.items = items;
                Ok(())
            }
            Err(e) => {
                let err = GestorError::from(e);
                self.feedback
                    .set_error(error_text(&err, "Error al cargar inventario."));
                Err(err)
            }
        }
    }

    pub async fn create(&mut self, form: &ItemForm) -> GestorResult<()> {
        const FALLBACK: &str = "No se pudo guardar el ítem.";
        self.feedback.dismiss_flash();
        let payload = match self.prepare(form) {
            Ok(p) => p,
            Err(e) => return Err(self.feedback.fail(e, FALLBACK)),
        };
        if let Err(e) = self.ctx.api.post("/items", &payload).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(descripcion = %payload.descripcion, "item created");
        self.feedback.set_flash(Flash::success("Ítem creado correctamente."));
        self.reload().await;
        Ok(())
    }

    pub async fn update(&mut self, id: &str, form: &ItemForm) -> GestorResult<()> {
        const FALLBACK: &str = "No se pudo guardar el ítem.";
        self.feedback.dismiss_flash();
        let payload = match self.prepare(form) {
            Ok(p) => p,
            Err(e) => return Err(self.feedback.fail(e, FALLBACK)),
        };
        if let Err(e) = self.ctx.api.put(&format!("/items/{}", id), &payload).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(id, "item updated");
        self.feedback
            .set_flash(Flash::success("Ítem actualizado correctamente."));
        self.reload().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: &str) -> GestorResult<()> {
        const FALLBACK: &str = "No se pudo eliminar el ítem.";
        self.feedback.dismiss_flash();
        if let Err(e) = self.ctx.require_admin("eliminar ítems") {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        if let Err(e) = self.ctx.api.delete(&format!("/items/{}", id)).await {
            return Err(self.feedback.fail(e.into(), FALLBACK));
        }
        tracing::info!(id, "item deleted");
        self.feedback.set_flash(Flash::info("Ítem eliminado."));
        self.reload().await;
        Ok(())
    }

    fn prepare(&self, form: &ItemForm) -> GestorResult<ItemPayload> {
        self.ctx.require_manage("crear o editar ítems")?;
        Ok(form.validate(self.ctx.thresholds)?)
    }

    async fn reload(&mut self) {
        if let Err(e) = self.load().await {
            tracing::debug!(error = %e, "reload after mutation failed");
        }
    }
}
