use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use clinicdesk_core::{
    errors::ClinicError,
    models::medical_record::{filter_records, MedicalRecordsQuery, MedicalRecordsResponse},
};

use crate::{
    middleware::{auth::Authenticated, error_handling::AppError},
    ApiState,
};

/// Lists the caller's own medical records, optionally narrowed by category
/// and a free-text search.
///
/// # Endpoint
///
/// ```text
/// GET /api/medical/records?category=immunization&search=flu
/// Authorization: Bearer <token>
/// x-user-id: <student id>
/// ```
#[axum::debug_handler]
pub async fn list_medical_records(
    State(state): State<Arc<ApiState>>,
    Authenticated(auth): Authenticated,
    query: Result<Query<MedicalRecordsQuery>, QueryRejection>,
) -> Result<Json<MedicalRecordsResponse>, AppError> {
    let student_id = auth.require_user_id()?;
    let Query(query) = query.map_err(|rejection| {
        ClinicError::Validation(format!("Invalid query: {}", rejection.body_text()))
    })?;

    let records = state
        .records
        .list_for_student(student_id, query.category)
        .await?;

    Ok(Json(MedicalRecordsResponse {
        records: filter_records(records, query.search.as_deref()),
    }))
}
