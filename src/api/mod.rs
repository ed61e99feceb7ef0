//! REST API client.
//!
//! [`ApiClient`] wraps an [`HttpClient`](crate::traits::HttpClient), attaches
//! the bearer token, parses JSON, and normalizes failures into [`ApiError`].

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::{error_message, ApiError};
