use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use bp_logger_domain::services::{EntryServiceError, ExportError};
use bp_logger_domain::session::IdentityError;

use crate::entities::common::PublicErrorResponse;

/// Errors returned by the page and form handlers
#[derive(Debug, Error)]
pub enum AppError {
    /// Name or date of birth missing on a new entry
    #[error("Name and DOB required")]
    MissingIdentity,

    #[error("Entry {0} not found")]
    NotFound(i64),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingIdentity | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON rendering for the `/api/v1` endpoints
    pub fn into_json_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::Internal(_) => PublicErrorResponse::new("internal_error", "An unexpected error occurred"),
            AppError::NotFound(_) => PublicErrorResponse::new("not_found", self.to_string()),
            _ => PublicErrorResponse::new("bad_request", self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::Internal(details) => {
                error!("Request failed: {}", details);
                "Internal Server Error".to_string()
            }
            _ => format!("Error: {}", self),
        };
        (status, body).into_response()
    }
}

impl From<EntryServiceError> for AppError {
    fn from(err: EntryServiceError) -> Self {
        match err {
            EntryServiceError::NotFound(id) => AppError::NotFound(id),
            EntryServiceError::Validation(_) => AppError::MissingIdentity,
            EntryServiceError::Export(export) => export.into(),
            EntryServiceError::Repository(details) => AppError::Internal(details),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::MissingBound(_) | ExportError::InvalidDate { .. } => AppError::BadRequest(err.to_string()),
            ExportError::Csv(_) | ExportError::Buffer(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Missing => AppError::MissingIdentity,
        }
    }
}
