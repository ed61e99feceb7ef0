//! Loan accounting: pending quantity, derived status, return clamping.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoanStatus {
    EnCurso,
    Vencido,
    Completo,
}

impl LoanStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::EnCurso => "EN_CURSO",
            LoanStatus::Vencido => "VENCIDO",
            LoanStatus::Completo => "COMPLETO",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `max(prestado - devuelto, 0)`.
pub fn pendiente(prestado: u32, devuelto: u32) -> u32 {
    prestado.saturating_sub(devuelto)
}

/// Status at `now`. Nothing pending is COMPLETO regardless of the due date.
pub fn loan_status(
    prestado: u32,
    devuelto: u32,
    fecha_vence: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> LoanStatus {
    if pendiente(prestado, devuelto) == 0 {
        return LoanStatus::Completo;
    }
    match fecha_vence {
        Some(due) if due < now => LoanStatus::Vencido,
        _ => LoanStatus::EnCurso,
    }
}

/// Amount actually submitted for a return of `requested` units.
pub fn clamp_return(requested: u32, pendiente: u32) -> u32 {
    requested.min(pendiente)
}

/// A due date covers the whole day: `YYYY-MM-DDT23:59:59Z`.
pub fn end_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_hms_opt(23, 59, 59).unwrap_or_default();
    Utc.from_utc_datetime(&naive)
}

/// Wire format of a due date: `2025-12-31T23:59:59.000Z`.
pub fn format_due_date(date: NaiveDate) -> String {
    end_of_day_utc(date)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}
