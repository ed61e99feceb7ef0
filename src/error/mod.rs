//! Error handling for the Gestor client.
//!
//! - **Error categories**: classification used for labels and hints
//! - **Domain errors**: validation, permission and session failures raised
//!   locally, plus [`ApiError`](crate::api::ApiError) from the REST boundary
//! - **Unified error type**: [`GestorError`] with `user_message()` for banners
//!
//! | Source | Raised | Request sent |
//! |--------|--------|--------------|
//! | `ValidationError` | form checks | no |
//! | `PermissionError` | role checks | no |
//! | `ApiError` | API client | yes |
//! | `SessionError` | local storage | n/a |

mod category;
mod gestor_error;
mod permission;
mod result;
mod session;
mod validation;

pub use category::ErrorCategory;
pub use gestor_error::GestorError;
pub use permission::PermissionError;
pub use result::GestorResult;
pub use session::SessionError;
pub use validation::{parse_non_negative, parse_positive, ValidationError};
