use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::wire::{
    deserialize_opt_count, deserialize_opt_id, parse_timestamp, pick_id, RawItemRef,
};

/// What a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Prestamo,
    Devolucion,
    Baja,
}

impl RequestKind {
    pub const ALL: [RequestKind; 3] = [
        RequestKind::Prestamo,
        RequestKind::Devolucion,
        RequestKind::Baja,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Prestamo => "prestamo",
            RequestKind::Devolucion => "devolucion",
            RequestKind::Baja => "baja",
        }
    }

    /// Label shown in tables.
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Prestamo => "Préstamo",
            RequestKind::Devolucion => "Devolución",
            RequestKind::Baja => "Baja",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prestamo" | "préstamo" => Ok(RequestKind::Prestamo),
            "devolucion" | "devolución" => Ok(RequestKind::Devolucion),
            "baja" => Ok(RequestKind::Baja),
            other => Err(format!(
                "Tipo desconocido '{}'. Usa prestamo, devolucion o baja.",
                other
            )),
        }
    }
}

/// Request status. Any status can be set from any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pendiente,
    Aprobada,
    Rechazada,
    Completa,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Pendiente,
        RequestStatus::Aprobada,
        RequestStatus::Rechazada,
        RequestStatus::Completa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pendiente => "pendiente",
            RequestStatus::Aprobada => "aprobada",
            RequestStatus::Rechazada => "rechazada",
            RequestStatus::Completa => "completa",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pendiente => "PENDIENTE",
            RequestStatus::Aprobada => "APROBADA",
            RequestStatus::Rechazada => "RECHAZADA",
            RequestStatus::Completa => "COMPLETA",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" => Ok(RequestStatus::Pendiente),
            "aprobada" => Ok(RequestStatus::Aprobada),
            "rechazada" => Ok(RequestStatus::Rechazada),
            "completa" => Ok(RequestStatus::Completa),
            other => Err(format!(
                "Estado desconocido '{}'. Usa pendiente, aprobada, rechazada o completa.",
                other
            )),
        }
    }
}

/// A loan, return or write-off request (solicitud).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRequest")]
pub struct LoanRequest {
    pub id: String,
    /// `None` when the backend sent an unknown type.
    pub tipo: Option<RequestKind>,
    pub persona: String,
    /// Referenced item id.
    pub item: String,
    /// Item description, when the backend embeds the item.
    pub item_nombre: Option<String>,
    pub cantidad: u32,
    pub estado: RequestStatus,
    pub observacion: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawRequest {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    tipo: Option<String>,
    #[serde(default)]
    persona: Option<String>,
    #[serde(default)]
    item: Option<RawItemRef>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    cantidad: Option<u32>,
    #[serde(default)]
    estado: Option<String>,
    #[serde(default)]
    observacion: Option<String>,
    #[serde(default, rename = "createdAt")]
    created_at: Option<String>,
}

impl From<RawRequest> for LoanRequest {
    fn from(raw: RawRequest) -> Self {
        let estado = match raw.estado.as_deref() {
            None | Some("") => RequestStatus::Pendiente,
            Some(s) => s.parse().unwrap_or_else(|_| {
                tracing::debug!(estado = s, "unknown request status, treating as pendiente");
                RequestStatus::Pendiente
            }),
        };
        let (item, item_nombre) = raw.item.map(RawItemRef::split).unwrap_or_default();
        Self {
            id: pick_id(raw.id, raw.mongo_id),
            tipo: raw.tipo.as_deref().and_then(|t| t.parse().ok()),
            persona: raw.persona.unwrap_or_default(),
            item,
            item_nombre,
            cantidad: raw.cantidad.unwrap_or(0),
            estado,
            observacion: raw.observacion.unwrap_or_default(),
            created_at: raw.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// Body of `POST /requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestPayload {
    pub tipo: RequestKind,
    pub item: String,
    pub persona: String,
    pub cantidad: u32,
    pub observacion: String,
    pub estado: RequestStatus,
}

/// Body of `PATCH /requests/:id/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPayload {
    pub estado: RequestStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode() {
        let req: LoanRequest = serde_json::from_value(json!({
            "_id": "r1",
            "tipo": "prestamo",
            "persona": "Juan Pérez",
            "item": "i9",
            "cantidad": 2,
            "estado": "aprobada",
            "createdAt": "2025-03-01T10:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(req.id, "r1");
        assert_eq!(req.tipo, Some(RequestKind::Prestamo));
        assert_eq!(req.item, "i9");
        assert_eq!(req.item_nombre, None);
        assert_eq!(req.estado, RequestStatus::Aprobada);
        assert!(req.created_at.is_some());
    }

    #[test]
    fn test_embedded_item() {
        let req: LoanRequest = serde_json::from_value(json!({
            "id": 1,
            "item": {"_id": "i9", "descripcion": "Multímetro"}
        }))
        .unwrap();
        assert_eq!(req.item, "i9");
        assert_eq!(req.item_nombre.as_deref(), Some("Multímetro"));
    }

    #[test]
    fn test_unknown_status_is_pending() {
        let req: LoanRequest =
            serde_json::from_value(json!({"id": 1, "estado": "archivada"})).unwrap();
        assert_eq!(req.estado, RequestStatus::Pendiente);
        let req: LoanRequest = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(req.estado, RequestStatus::Pendiente);
        assert_eq!(req.tipo, None);
    }

    #[test]
    fn test_status_payload_wire() {
        let body = serde_json::to_value(StatusPayload {
            estado: RequestStatus::Completa,
        })
        .unwrap();
        assert_eq!(body, json!({"estado": "completa"}));
    }

    #[test]
    fn test_parse_kind_accepts_accents() {
        assert_eq!("Devolución".parse::<RequestKind>().unwrap(), RequestKind::Devolucion);
        assert!("otro".parse::<RequestKind>().is_err());
    }
}
