use std::sync::Arc;

use axum::http::StatusCode;
use clinicdesk_core::{
    errors::{ClinicError, GENERIC_STORE_ERROR},
    models::medical_record::{MedicalRecordsResponse, RecordCategory},
};
use clinicdesk_db::mock::{memory::MemoryStore, repositories::MockMedicalRecordStore};
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{build_server, medical_record, with_headers, TestContext, RECORDS_PATH};

const STUDENT: &[(&str, &str)] = &[
    ("authorization", "Bearer student-token"),
    ("x-user-role", "STUDENT"),
    ("x-user-id", "student-1"),
];

async fn seeded() -> TestContext {
    let ctx = TestContext::new();

    let mut flu = medical_record("student-1", RecordCategory::Immunization, "Flu Vaccine", 30);
    flu.notes = Some("Seasonal influenza".to_string());
    let mut physical = medical_record("student-1", RecordCategory::Medical, "Annual Physical", 2);
    physical.department_name = Some("Sports Medicine".to_string());
    let blood = medical_record("student-1", RecordCategory::Lab, "Blood Panel", 10);
    let other = medical_record("student-2", RecordCategory::Medical, "Annual Physical", 1);

    for record in [flu, physical, blood, other] {
        ctx.store.seed_medical_record(record).await;
    }
    ctx
}

fn form_types(response: &MedicalRecordsResponse) -> Vec<&str> {
    response.records.iter().map(|r| r.form_type.as_str()).collect()
}

#[tokio::test]
async fn test_lists_only_own_records_newest_first() {
    let ctx = seeded().await;

    let response = with_headers(ctx.server.get(RECORDS_PATH), STUDENT).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let listing = response.json::<MedicalRecordsResponse>();
    assert_eq!(
        form_types(&listing),
        vec!["Annual Physical", "Blood Panel", "Flu Vaccine"]
    );
    assert!(listing.records.iter().all(|r| r.student_id == "student-1"));
}

#[tokio::test]
async fn test_category_narrows_the_listing() {
    let ctx = seeded().await;

    let response = with_headers(ctx.server.get(RECORDS_PATH), STUDENT)
        .add_query_param("category", "immunization")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        form_types(&response.json::<MedicalRecordsResponse>()),
        vec!["Flu Vaccine"]
    );
}

#[tokio::test]
async fn test_search_matches_notes_and_department_case_insensitively() {
    let ctx = seeded().await;

    let by_notes = with_headers(ctx.server.get(RECORDS_PATH), STUDENT)
        .add_query_param("search", "INFLUENZA")
        .await;
    assert_eq!(
        form_types(&by_notes.json::<MedicalRecordsResponse>()),
        vec!["Flu Vaccine"]
    );

    let by_department = with_headers(ctx.server.get(RECORDS_PATH), STUDENT)
        .add_query_param("search", "sports")
        .await;
    assert_eq!(
        form_types(&by_department.json::<MedicalRecordsResponse>()),
        vec!["Annual Physical"]
    );
}

#[tokio::test]
async fn test_student_without_records_gets_empty_list() {
    let ctx = seeded().await;

    let response = with_headers(
        ctx.server.get(RECORDS_PATH),
        &[("authorization", "Bearer t"), ("x-user-id", "student-9")],
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "records": [] }));
}

#[tokio::test]
async fn test_missing_user_id_is_unauthorized() {
    let ctx = seeded().await;

    let response = with_headers(
        ctx.server.get(RECORDS_PATH),
        &[("authorization", "Bearer t"), ("x-user-role", "STUDENT")],
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_bearer_is_unauthorized() {
    let ctx = seeded().await;

    let response = with_headers(ctx.server.get(RECORDS_PATH), &[("x-user-id", "student-1")]).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>(), json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn test_unknown_category_is_bad_request() {
    let ctx = seeded().await;

    let response = with_headers(ctx.server.get(RECORDS_PATH), STUDENT)
        .add_query_param("category", "dental")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_failure_is_generic_server_error() {
    let mut records = MockMedicalRecordStore::new();
    records
        .expect_list_for_student()
        .with(predicate::eq("student-1"), predicate::eq(None::<RecordCategory>))
        .times(1)
        .returning(|_, _| Err(ClinicError::Database(eyre::eyre!("pool timed out"))));
    let server = build_server(Arc::new(MemoryStore::new()), Arc::new(records));

    let response = with_headers(server.get(RECORDS_PATH), STUDENT).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": GENERIC_STORE_ERROR }));
}
