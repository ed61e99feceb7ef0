//! Pure business rules over entity records.
//!
//! Nothing here performs I/O. View-models and the CLI call these on every
//! render, so derived values are never cached or persisted.
//!
//! ## Rules
//!
//! - [`stock_level`] - OK / BAJO / CRÍTICO from quantity and thresholds
//! - [`pendiente`] and [`loan_status`] - partial-return accounting
//! - [`can_manage`], [`can_delete`], [`is_admin`] - role gates

pub mod loans;
pub mod permissions;
pub mod stock;

pub use loans::{
    clamp_return, end_of_day_utc, format_due_date, loan_status, pendiente, LoanStatus,
};
pub use permissions::{can_delete, can_manage, is_admin};
pub use stock::{has_alerts, stock_level, StockLevel, StockThresholds};
