use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::item::Item;
use super::wire::{
    date_prefix, deserialize_opt_count, deserialize_opt_id, parse_timestamp, pick_id, RawItemRef,
};
use crate::domain::{loan_status, pendiente, LoanStatus};

/// Display name for a loan whose item cannot be resolved.
pub const UNKNOWN_ITEM: &str = "No especificado";

/// A loan (préstamo) as read from `GET /loans`.
///
/// `devuelto` is clamped into `[0, prestado]` on decode. Status is never
/// read from the wire; see [`Loan::status`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawLoan")]
pub struct Loan {
    pub id: String,
    /// Referenced item id.
    pub item: String,
    /// Description from an embedded item object, if the backend sent one.
    pub item_nombre: Option<String>,
    pub persona: String,
    pub prestado: u32,
    pub devuelto: u32,
    /// Loan date as `YYYY-MM-DD` (`fechaEntrega`, else `createdAt`).
    pub fecha_prestamo: String,
    pub fecha_vence: Option<DateTime<Utc>>,
    pub observacion: String,
}

impl Loan {
    pub fn pendiente(&self) -> u32 {
        pendiente(self.prestado, self.devuelto)
    }

    /// Status at `now`.
    pub fn status(&self, now: DateTime<Utc>) -> LoanStatus {
        loan_status(self.prestado, self.devuelto, self.fecha_vence, now)
    }

    /// Item name: embedded description, else the loaded item list, else
    /// [`UNKNOWN_ITEM`].
    pub fn item_name<'a>(&'a self, items: &'a HashMap<String, Item>) -> &'a str {
        if let Some(ref nombre) = self.item_nombre {
            return nombre;
        }
        items
            .get(&self.item)
            .map(|i| i.descripcion.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or(UNKNOWN_ITEM)
    }

    /// Due date as `YYYY-MM-DD`, or empty.
    pub fn fecha_vence_label(&self) -> String {
        self.fecha_vence
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct RawLoan {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    item: Option<RawItemRef>,
    #[serde(default)]
    persona: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    prestado: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    devuelto: Option<u32>,
    #[serde(default, rename = "fechaEntrega")]
    fecha_entrega: Option<String>,
    #[serde(default, rename = "createdAt")]
    created_at: Option<String>,
    #[serde(default, rename = "fechaVence")]
    fecha_vence: Option<String>,
    #[serde(default)]
    observacion: Option<String>,
}

impl From<RawLoan> for Loan {
    fn from(raw: RawLoan) -> Self {
        let (item, item_nombre) = raw.item.map(RawItemRef::split).unwrap_or_default();
        let prestado = raw.prestado.unwrap_or(0);
        let fecha_prestamo = raw
            .fecha_entrega
            .filter(|s| !s.is_empty())
            .or(raw.created_at)
            .map(|s| date_prefix(&s))
            .unwrap_or_default();
        Self {
            id: pick_id(raw.id, raw.mongo_id),
            item,
            item_nombre,
            persona: raw.persona.unwrap_or_default(),
            prestado,
            devuelto: raw.devuelto.unwrap_or(0).min(prestado),
            fecha_prestamo,
            fecha_vence: raw.fecha_vence.as_deref().and_then(parse_timestamp),
            observacion: raw.observacion.unwrap_or_default(),
        }
    }
}

/// Body of `POST /loans`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanPayload {
    pub item: String,
    pub persona: String,
    pub prestado: u32,
    /// `YYYY-MM-DDT23:59:59.000Z`.
    #[serde(rename = "fechaVence")]
    pub fecha_vence: String,
    pub observacion: String,
}

/// Body of `PATCH /loans/:id/return`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReturnPayload {
    pub cantidad: u32,
}
