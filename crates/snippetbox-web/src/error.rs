use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use snippetbox_core::DomainError;
use snippetbox_security::SessionStoreError;
use thiserror::Error;

/// Errors a handler or middleware can bail out with.
///
/// Clients only ever see the canonical status text; the detail goes to the log.
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match self {
            WebError::NotFound => StatusCode::NOT_FOUND,
            WebError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                StatusCode::BAD_REQUEST
            }
            WebError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}

impl From<DomainError> for WebError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound => WebError::NotFound,
            other => WebError::Internal(other.to_string()),
        }
    }
}

impl From<SessionStoreError> for WebError {
    fn from(err: SessionStoreError) -> Self {
        WebError::Internal(err.to_string())
    }
}
