//! # Consultation Handlers
//!
//! HTTP entry points for the scheduling service. The listing is public and
//! cacheable; creation requires an administrator.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use clinicdesk_core::models::consultation::{
    ConsultationDatesResponse, CreateConsultationDateRequest, CreateConsultationDateResponse,
};

use crate::{
    middleware::{auth::Authenticated, error_handling::AppError},
    ApiState,
};

/// Cache directives for the public listing.
pub const LIST_CACHE_CONTROL: &str = "public, s-maxage=10, stale-while-revalidate=59";

/// Lists upcoming consultation dates.
///
/// # Endpoint
///
/// ```text
/// GET /api/consultation/dates
/// ```
#[axum::debug_handler]
pub async fn list_consultation_dates(
    State(state): State<Arc<ApiState>>,
) -> Result<impl IntoResponse, AppError> {
    let listing = state.scheduling.list().await?;
    let body: ConsultationDatesResponse = (*listing).clone();

    Ok(([(header::CACHE_CONTROL, LIST_CACHE_CONTROL)], Json(body)))
}

/// Creates a consultation date and its time slots.
///
/// # Endpoint
///
/// ```text
/// POST /api/consultation/dates
/// Authorization: Bearer <token>
/// x-user-role: ADMIN
///
/// { "date": "2030-05-01", "timeSlots": [{ "startTime": "09:00", "endTime": "09:30" }] }
/// ```
///
/// # Errors
///
/// * 401 - no bearer token, or the caller is not an administrator
/// * 400 - malformed body, or the date already exists
/// * 500 - store failure
#[axum::debug_handler]
pub async fn create_consultation_date(
    State(state): State<Arc<ApiState>>,
    Authenticated(auth): Authenticated,
    payload: Result<Json<CreateConsultationDateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateConsultationDateResponse>), AppError> {
    // The role is judged before the body
    auth.require_admin()?;
    let Json(request) = payload?;

    let consultation_date = state.scheduling.create(&auth, &request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateConsultationDateResponse { consultation_date }),
    ))
}
