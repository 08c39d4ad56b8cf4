use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::reports::services::StoreError;
use crate::modules::storage::StorageError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Report store error: {0}")]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl AppError {
    /// Status code for a report store failure
    pub fn store_status(err: &StoreError) -> StatusCode {
        match err {
            StoreError::Storage(StorageError::QuotaExceeded { .. }) => {
                StatusCode::INSUFFICIENT_STORAGE
            }
            StoreError::InvalidTransition { .. } | StoreError::DuplicateId(_) => {
                StatusCode::CONFLICT
            }
            StoreError::Storage(_) | StoreError::Corrupt(_) | StoreError::Serialize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Store(ref e) => {
                let status = Self::store_status(e);
                if status.is_server_error() {
                    tracing::error!("Report store error: {:?}", e);
                }
                (status, e.to_string(), None)
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::ExternalServiceError(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::ReportStatus;

    #[test]
    fn test_quota_exceeded_maps_to_insufficient_storage() {
        let err = StoreError::Storage(StorageError::QuotaExceeded {
            key: "bmc_reports".to_string(),
            needed: 10,
            quota: 5,
        });
        assert_eq!(
            AppError::store_status(&err),
            StatusCode::INSUFFICIENT_STORAGE
        );
    }

    #[test]
    fn test_reverse_transition_maps_to_conflict() {
        let err = StoreError::InvalidTransition {
            id: 1,
            from: ReportStatus::Resolved,
            to: ReportStatus::PendingReview,
        };
        assert_eq!(AppError::store_status(&err), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Store(err).into_response().status(),
            StatusCode::CONFLICT
        );
    }
}
