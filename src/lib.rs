//! Gestor: terminal client for an inventory, request and loan backend.
//!
//! The library exposes the REST client, the session store, the per-section
//! view-models and the CLI so integration tests can drive them.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod cli_output;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod traits;
pub mod views;
