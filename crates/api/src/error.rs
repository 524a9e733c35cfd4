//! Error responses.
//!
//! Every failure leaves the API as `{ "success": false, "msg": ... }`. The
//! status code comes from [`AppError::status_code`]; server-side failures are
//! logged here and shown to the client only as a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nsgd_core::ledger::LedgerError;
use nsgd_core::storage::StorageError;
use nsgd_shared::AppError;
use serde_json::json;
use tracing::{error, info};

/// Handler error that renders as a JSON failure body.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(err.into())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if err.is_server_error() {
            error!(code = err.error_code(), error = %err, "Request failed");
        } else {
            info!(code = err.error_code(), error = %err, "Request rejected");
        }

        (
            status,
            Json(json!({
                "success": false,
                "msg": err.client_message()
            })),
        )
            .into_response()
    }
}
