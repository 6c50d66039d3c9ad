//! Error types for the todo web client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the search and detail views
//! tell the user "no todo with this ID" instead of a generic failure. All
//! other non-2xx responses land in `HttpError` with the raw status and body.
//! Transport failures are produced by the host and wrapped unchanged.

use thiserror::Error;

use crate::types::TodoId;

/// Errors returned by `TodoClient` and surfaced by the handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network failure: {0}")]
    Transport(#[from] TransportError),

    /// The server returned 404 for a get-by-id.
    #[error("todo {id} not found")]
    NotFound { id: TodoId },

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// Failure reported by a `Transport` implementation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Form input rejected before any request is sent. `Display` is the
/// user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("El título es obligatorio")]
    EmptyTitle,

    #[error("El ID «{0}» no es un número válido")]
    InvalidId(String),

    #[error("La prioridad «{0}» no es válida")]
    InvalidPriority(String),

    #[error("La fecha «{0}» no es válida")]
    InvalidDueAt(String),
}
