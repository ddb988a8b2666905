//! Request extraction helpers.
//!
//! Axum answers a malformed body, path or query string with a plain-text
//! rejection. Handlers take `Result<Extractor<T>, Rejection>` instead and
//! pass it through one of these helpers so the client always receives the
//! `{error, message}` JSON body.
//!
//! ```ignore
//! async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., ApiError> {
//!     let req = extract_json(body)?;
//! }
//! ```

use axum::{
    Json,
    extract::{
        Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};

use crate::error::ApiError;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

/// Unwraps a JSON body, mapping deserialization errors to a validation error.
///
/// # Errors
///
/// Returns `ApiError` with `VALIDATION_ERROR` when the body is missing,
/// not JSON, or does not match `T`.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    result.map(|Json(v)| v).map_err(ApiError::from)
}

/// Unwraps path parameters, e.g. a segment that is not a UUID.
///
/// # Errors
///
/// Returns `ApiError` with `VALIDATION_ERROR` when a segment fails to parse.
pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, ApiError> {
    result.map(|Path(v)| v).map_err(ApiError::from)
}

/// Unwraps the query string.
///
/// # Errors
///
/// Returns `ApiError` with `VALIDATION_ERROR` when a parameter fails to parse.
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    result.map(|Query(v)| v).map_err(ApiError::from)
}
