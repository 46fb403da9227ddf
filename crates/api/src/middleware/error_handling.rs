//! # Error Handling Middleware
//!
//! This module maps [`ClinicError`] onto HTTP status codes and JSON error
//! bodies of the form `{ "error": "<message>" }`.
//!
//! Store and internal failures are logged in full here and reach the caller
//! only as a generic message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clinicdesk_core::errors::ClinicError;
use serde_json::json;
use tracing::{error, warn};

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `ClinicError` instances and implements
/// `IntoResponse` so handlers can return `Result<_, AppError>` and use `?`
/// on anything that converts into a `ClinicError`.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use clinicdesk_api::middleware::error_handling::AppError;
/// use clinicdesk_core::errors::ClinicError;
///
/// async fn handler(date: Option<String>) -> Result<Json<String>, AppError> {
///     let date = date.ok_or_else(|| ClinicError::Validation("missing date".into()))?;
///     Ok(Json(date))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ClinicError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClinicError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
            ClinicError::Conflict(_) => StatusCode::BAD_REQUEST,
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ClinicError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.0.is_server_error() {
            error!("Request failed: {:?}", self.0);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self.0);
        }

        let body = Json(json!({ "error": self.0.public_message() }));

        (status, body).into_response()
    }
}

/// Automatic conversion from ClinicError to AppError
impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        AppError(err)
    }
}

/// A body that axum could not read as JSON is a malformed request.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(ClinicError::Validation(format!(
            "Invalid request data: {}",
            rejection.body_text()
        )))
    }
}

/// Maps a ClinicError to an HTTP response
pub fn map_error(err: ClinicError) -> Response {
    AppError(err).into_response()
}
