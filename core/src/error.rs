//! Error types for the todo resource and the todo API client.
//!
//! # Design
//! `TodoError` is what the resource returns. A malformed identifier and an
//! absent record both collapse into `NotFound`, so callers cannot tell the
//! two apart and cannot probe the identifier format. Store failures are
//! never masked; they surface as `Store`.
//!
//! `ApiError` is the client-side view of the same failures, recovered from
//! HTTP status codes.

use thiserror::Error;

/// Errors returned by `TodoResource` operations.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("invalid todo: {0}")]
    Validation(#[from] ValidationError),

    #[error("todo not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<InvalidId> for TodoError {
    fn from(_: InvalidId) -> Self {
        TodoError::NotFound
    }
}

/// Rejected client input. The store is never touched when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("text must be a string")]
    TextNotString,

    #[error("text must not be empty")]
    EmptyText,
}

/// A string that is not structurally a todo identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed todo id {0:?}")]
pub struct InvalidId(pub String);

/// Infrastructure failure reported by a `TodoStore`.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A todo document whose `completed` flag disagrees with `completedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("completedAt must be set exactly when completed is true")]
pub struct InconsistentCompletion;

/// Errors returned by `TodoClient` parse and build methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; the todo does not exist or the id is malformed.
    #[error("resource not found")]
    NotFound,

    /// The server rejected the submitted payload with 400.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
