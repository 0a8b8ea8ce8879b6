//! Mapping of engine errors onto HTTP responses.
//!
//! | Error | Status |
//! |-------|--------|
//! | `*NotFound` | 404 |
//! | `InvalidState`, `PollNotActive`, `PersistenceConflict` | 409 |
//! | `InvalidIndex` | 422 |
//! | `ValidationFailed`, malformed ids | 400 |
//! | `Infrastructure` | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::presentation::PresentationError;

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Error returned by every API handler.
#[derive(Debug)]
pub enum ApiError {
    Domain(PresentationError),
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(err) => match err {
                PresentationError::PresentationNotFound(_)
                | PresentationError::SessionNotFound(_)
                | PresentationError::SlideNotFound(_)
                | PresentationError::PollNotFound(_) => StatusCode::NOT_FOUND,
                PresentationError::InvalidState(_)
                | PresentationError::PollNotActive(_)
                | PresentationError::PersistenceConflict(_) => StatusCode::CONFLICT,
                PresentationError::InvalidIndex { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                PresentationError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
                PresentationError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<PresentationError> for ApiError {
    fn from(err: PresentationError) -> Self {
        ApiError::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(message) => ErrorResponse::new("BAD_REQUEST", message),
            ApiError::Domain(PresentationError::Infrastructure(message)) => {
                tracing::error!(error = %message, "request failed");
                ErrorResponse::new("INTERNAL_ERROR", "Internal server error")
            }
            ApiError::Domain(err) => {
                let body = ErrorResponse::new(err.code().to_string(), err.to_string());
                match &err {
                    PresentationError::ValidationFailed { field, .. } => {
                        body.with_details(serde_json::json!({ "field": field }))
                    }
                    PresentationError::InvalidIndex { index, len } => {
                        body.with_details(serde_json::json!({ "index": index, "len": len }))
                    }
                    _ => body,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Parses an identifier taken from the request path.
pub fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {} ID", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PollId, SessionId};

    fn status_of(err: PresentationError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            status_of(PresentationError::SessionNotFound(SessionId::new())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn state_conflicts_map_to_409() {
        assert_eq!(
            status_of(PresentationError::invalid_state("already started")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(PresentationError::PollNotActive(PollId::new())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(PresentationError::PersistenceConflict("retries".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn invalid_index_maps_to_422() {
        assert_eq!(
            status_of(PresentationError::InvalidIndex { index: 4, len: 2 }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn validation_maps_to_400_and_infrastructure_to_500() {
        assert_eq!(
            status_of(PresentationError::validation("title", "cannot be empty")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(PresentationError::infrastructure("db down")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn malformed_id_is_bad_request() {
        let err = parse_id::<SessionId>("not-a-uuid", "session").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
