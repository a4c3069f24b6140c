use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::error::MatchError;
use crate::models::ErrorResponse;
use crate::services::{ExportError, HistoryError, ImportError, StoreError};

/// Errors surfaced by HTTP handlers, rendered as JSON [`ErrorResponse`]s
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Contract(#[from] MatchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Matching run was interrupted: {0}")]
    Interrupted(#[from] BlockingError),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_failed",
            ApiError::Contract(_) => "invalid_roster",
            ApiError::Store(StoreError::NotFound(_)) => "not_found",
            ApiError::Store(StoreError::AlreadyConfirmed(_)) => "already_confirmed",
            ApiError::Store(StoreError::ConfirmationInProgress(_)) => "confirmation_in_progress",
            ApiError::Store(StoreError::History(_)) | ApiError::History(_) => "history_unavailable",
            ApiError::Import(_) => "invalid_csv",
            ApiError::Export(_) => "export_failed",
            ApiError::Interrupted(_) => "matching_interrupted",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Contract(_) | ApiError::Import(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::AlreadyConfirmed(_))
            | ApiError::Store(StoreError::ConfirmationInProgress(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::History(_))
            | ApiError::History(_)
            | ApiError::Export(_)
            | ApiError::Interrupted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}
