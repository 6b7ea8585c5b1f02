//! Workflow error types.

use document_store::StoreError;
use thiserror::Error;

/// Errors returned by the event workflows.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An event with this name already exists.
    #[error("event already exists: {0}")]
    EventAlreadyExists(String),

    /// The tag belongs to events created by a different user.
    #[error("tag '{0}' is owned by another user")]
    TagOwnedByAnotherUser(String),

    /// The date-time is not in `YYYY-MM-DD HH:MM` form.
    #[error("invalid date time '{0}', expected YYYY-MM-DD HH:MM")]
    InvalidDateTime(String),

    #[error("continent not found: {0}")]
    ContinentNotFound(String),

    #[error("country not found: {0}")]
    CountryNotFound(i64),

    /// Country percentages of an online ticket config must add up to 100.
    #[error("country percentages must total 100, got {0}")]
    InvalidPercentageTotal(i64),

    /// The request is missing required fields or carries invalid values.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A search matched no events.
    #[error("event not found")]
    EventsNotFound,

    /// A repository call failed. Passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification used by callers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    AlreadyExists,
    Conflict,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        }
    }
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::EventAlreadyExists(_) => ErrorKind::AlreadyExists,
            ServiceError::TagOwnedByAnotherUser(_) => ErrorKind::Conflict,
            ServiceError::InvalidDateTime(_)
            | ServiceError::ContinentNotFound(_)
            | ServiceError::CountryNotFound(_)
            | ServiceError::InvalidPercentageTotal(_)
            | ServiceError::Validation(_) => ErrorKind::BadRequest,
            ServiceError::EventsNotFound => ErrorKind::NotFound,
            ServiceError::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Convenience type alias for workflow results.
pub type Result<T> = std::result::Result<T, ServiceError>;
