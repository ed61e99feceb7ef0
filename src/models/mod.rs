//! Wire records for the Gestor REST API.
//!
//! Read records (`Item`, `LoanRequest`, `Loan`, `User`) decode through
//! private raw structs that absorb backend variations; write payloads
//! serialize exactly the fields each endpoint expects.

mod item;
mod loan;
mod request;
mod role;
mod user;
pub mod wire;

pub use item::{Item, ItemPayload, DEFAULT_RESPONSABLE};
pub use loan::{Loan, LoanPayload, ReturnPayload, UNKNOWN_ITEM};
pub use request::{LoanRequest, RequestKind, RequestPayload, RequestStatus, StatusPayload};
pub use role::Role;
pub use user::{NewUserPayload, UpdateUserPayload, User};
