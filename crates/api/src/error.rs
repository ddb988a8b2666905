//! API error rendering.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use dds_core::returns::VatReturnError;
use dds_shared::AppError;

/// Any failure a handler can return.
#[derive(Debug)]
pub enum ApiError {
    /// Raised by the VAT return service.
    Domain(VatReturnError),
    /// Raised around the domain, e.g. a malformed request parameter.
    App(AppError),
}

impl ApiError {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::App(AppError::Validation(msg.into()))
    }

    fn parts(&self) -> (u16, &'static str, String) {
        match self {
            Self::Domain(e) => (e.status_code(), e.error_code(), e.to_string()),
            Self::App(e) => (e.status_code(), e.error_code(), e.to_string()),
        }
    }
}

impl From<VatReturnError> for ApiError {
    fn from(err: VatReturnError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if status.is_server_error() {
            error!(error = %message, code, "Request failed");
            "An internal error occurred".to_string()
        } else {
            if status == StatusCode::CONFLICT {
                warn!(error = %message, code, "Request conflicts with current state");
            }
            message
        };

        (
            status,
            Json(json!({
                "error": code,
                "message": message
            })),
        )
            .into_response()
    }
}
