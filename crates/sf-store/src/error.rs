//! Store error taxonomy.
//!
//! Validation errors are caught synchronously before any network call.
//! Remote errors never reach the synchronous mutation path — the
//! in-memory tree and local cache stay authoritative, and failures
//! surface as non-blocking notifications.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Caught before any network call; surfaced inline at the field.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("project {0} not found")]
    NotFound(String),

    /// Remote I/O failure. The user's work is never lost to one of
    /// these; the cache keeps the authoritative copy.
    #[error("remote store error: {0}")]
    Remote(String),

    #[error("subdomain \"{0}\" is already taken")]
    SubdomainTaken(String),
}

impl StoreError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }
}
