//! Authentication for the Gestor client.
//!
//! This module provides:
//! - The in-memory [`Session`] (user + bearer token)
//! - [`SessionManager`] for login, logout and persistence in a local store

pub mod session;

pub use session::{Session, SessionManager, TOKEN_KEY, USER_KEY};
