//! Error types for the catalog client.
//!
//! # Design
//! `ApiError` covers everything that can go wrong once a request is involved:
//! building it, carrying it, or reading its response. `FormError` covers the
//! create form only and is raised before any request exists, so it never turns
//! into a network error.
//!
//! The view state shows exactly one message at a time. `user_message` is the
//! single place that turns an `ApiError` into that text.

use thiserror::Error;

/// Errors returned by `CatalogClient` build/parse methods and transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 for the requested entry.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Render the message shown to the user, e.g. `failed to load entries (HTTP 500)`.
    pub fn user_message(&self, action: &str) -> String {
        match self.status() {
            Some(status) => format!("failed to {action} (HTTP {status})"),
            None => format!("failed to {action}: {self}"),
        }
    }
}

/// Client-side rejections of the create form. No request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("title is required")]
    MissingTitle,

    #[error("{field} must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}
