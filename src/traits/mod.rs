//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport used by the API client
//! - [`LocalStore`] - Persisted key/value storage used by the session

pub mod http;
pub mod storage;

pub use http::{Headers, HttpClient, HttpError, Method, Response};
pub use storage::{LocalStore, StorageError};
