//! HTTP-boundary error type.
//!
//! Three classes of failure reach the client:
//! - client errors (bad input, wrong method, CSRF failure) keep their 4xx status
//! - not-found (missing snippet, malformed id, unknown route) is a 404
//! - everything else is a server error: logged in full, answered with a bare 500

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::models::StoreError;
use crate::templates::TemplateError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("client error: {0}")]
    Client(StatusCode),

    #[error("session layer is not installed on this route")]
    MissingSession,

    #[error("store error: {0}")]
    Store(StoreError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound,
            other => AppError::Store(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Client(status) => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Server error");
        }
        status_response(status)
    }
}

/// Plain-text response carrying only the canonical reason phrase.
pub fn status_response(status: StatusCode) -> Response {
    (status, status.canonical_reason().unwrap_or_default()).into_response()
}
