//! Table rows for the list commands.

use crate::domain::StockThresholds;
use crate::models::{Item, LoanRequest, User};
use crate::views::LoanRow;

pub const ITEM_HEADERS: &[&str] = &[
    "ID",
    "DESCRIPCIÓN",
    "CATEGORÍA",
    "CANT",
    "MÍN",
    "CRÍT",
    "ESTADO",
    "RESPONSABLE",
];

pub const REQUEST_HEADERS: &[&str] = &[
    "ID", "FECHA", "TIPO", "EQUIPO", "PERSONA", "CANT", "ESTADO",
];

pub const LOAN_HEADERS: &[&str] = &[
    "ID",
    "EQUIPO",
    "PERSONA",
    "ENTREGA",
    "PRESTADO",
    "DEVUELTO",
    "PENDIENTE",
    "VENCE",
    "ESTADO",
];

pub const USER_HEADERS: &[&str] = &["ID", "NOMBRE", "USUARIO", "EMAIL", "ROL", "ACTIVO"];

/// Thresholds shown are the effective ones, defaults filled in.
pub fn item_row(item: &Item, defaults: StockThresholds) -> Vec<String> {
    let thresholds = item.thresholds(defaults);
    vec![
        item.id.clone(),
        item.descripcion.clone(),
        item.categoria.clone(),
        item.cantidad.to_string(),
        thresholds.bajo.to_string(),
        thresholds.critico.to_string(),
        item.stock_level(defaults).label().to_string(),
        item.responsable.clone(),
    ]
}

pub fn request_row(request: &LoanRequest, item_nombre: &str) -> Vec<String> {
    vec![
        request.id.clone(),
        request
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string()),
        request
            .tipo
            .map(|t| t.label().to_string())
            .unwrap_or_else(|| "-".to_string()),
        item_nombre.to_string(),
        request.persona.clone(),
        request.cantidad.to_string(),
        request.estado.label().to_string(),
    ]
}

pub fn loan_row(row: &LoanRow<'_>) -> Vec<String> {
    let vence = row.loan.fecha_vence_label();
    vec![
        row.loan.id.clone(),
        row.item_nombre.to_string(),
        row.loan.persona.clone(),
        or_dash(&row.loan.fecha_prestamo),
        row.loan.prestado.to_string(),
        row.loan.devuelto.to_string(),
        row.pendiente.to_string(),
        or_dash(&vence),
        row.status.label().to_string(),
    ]
}

pub fn user_row(user: &User) -> Vec<String> {
    vec![
        user.id.clone(),
        user.nombre.clone(),
        user.usuario.clone(),
        user.email.clone(),
        user.rol.to_string(),
        if user.activo { "Sí" } else { "No" }.to_string(),
    ]
}

fn or_dash(text: &str) -> String {
    if text.is_empty() {
        "-".to_string()
    } else {
        text.to_string()
    }
}
