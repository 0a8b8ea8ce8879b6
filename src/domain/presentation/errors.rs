//! Error taxonomy for the presentation aggregate and its live sessions.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | *NotFound | 404 |
//! | InvalidState | 409 |
//! | InvalidIndex | 422 |
//! | PollNotActive | 409 |
//! | ValidationFailed | 400 |
//! | PersistenceConflict | 409 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{
    DomainError, ErrorCode, PollId, PresentationId, SessionId, SlideId, ValidationError,
};

/// Errors reported synchronously by every engine operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PresentationError {
    #[error("Presentation not found: {0}")]
    PresentationNotFound(PresentationId),

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Slide not found: {0}")]
    SlideNotFound(SlideId),

    /// The poll definition does not exist, or has no activation to act upon.
    #[error("Poll not found: {0}")]
    PollNotFound(PollId),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Slide index {index} is out of bounds for a deck of {len} slides")]
    InvalidIndex { index: usize, len: usize },

    #[error("Poll {0} has no active instance in this session")]
    PollNotActive(PollId),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// Concurrent writers kept winning the optimistic-locking race.
    #[error("Persistence conflict: {0}")]
    PersistenceConflict(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl PresentationError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        PresentationError::InvalidState(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PresentationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PresentationError::Infrastructure(message.into())
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PresentationError::PresentationNotFound(_) => ErrorCode::PresentationNotFound,
            PresentationError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            PresentationError::SlideNotFound(_) => ErrorCode::SlideNotFound,
            PresentationError::PollNotFound(_) => ErrorCode::PollNotFound,
            PresentationError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            PresentationError::InvalidIndex { .. } => ErrorCode::InvalidIndex,
            PresentationError::PollNotActive(_) => ErrorCode::PollNotActive,
            PresentationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            PresentationError::PersistenceConflict(_) => ErrorCode::ConcurrencyConflict,
            PresentationError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PresentationError::PresentationNotFound(_)
                | PresentationError::SessionNotFound(_)
                | PresentationError::SlideNotFound(_)
                | PresentationError::PollNotFound(_)
        )
    }
}

impl From<ValidationError> for PresentationError {
    fn from(err: ValidationError) -> Self {
        PresentationError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for PresentationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ConcurrencyConflict => PresentationError::PersistenceConflict(err.message),
            ErrorCode::ValidationFailed => PresentationError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition => PresentationError::InvalidState(err.message),
            _ => PresentationError::Infrastructure(err.to_string()),
        }
    }
}
