use std::sync::Arc;

use axum::http::StatusCode;
use clinicdesk_core::{
    errors::{ClinicError, GENERIC_STORE_ERROR},
    models::consultation::{
        ConsultationDatesResponse, CreateConsultationDateResponse, DUPLICATE_DATE_MESSAGE,
    },
};
use clinicdesk_db::mock::{memory::MemoryStore, repositories::MockConsultationStore};
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use crate::test_utils::{
    build_server, consultation_date, days_from_today, t, with_headers, TestContext, ADMIN,
    DATES_PATH,
};

fn two_slot_body(date: &str) -> Value {
    json!({
        "date": date,
        "timeSlots": [
            { "startTime": "09:00", "endTime": "09:30" },
            { "startTime": "09:30", "endTime": "10:00" }
        ]
    })
}

#[tokio::test]
async fn test_list_empty_carries_cache_headers() {
    let ctx = TestContext::new();

    let response = ctx.server.get(DATES_PATH).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.header("cache-control"),
        "public, s-maxage=10, stale-while-revalidate=59"
    );
    assert_eq!(response.json::<Value>(), json!({ "consultationDates": [] }));
}

#[tokio::test]
async fn test_list_returns_upcoming_active_dates_with_available_slots() {
    let ctx = TestContext::new();

    let later = consultation_date(
        days_from_today(7),
        true,
        &[
            (t(14, 0), t(14, 30), true),
            (t(8, 0), t(8, 30), true),
            (t(10, 0), t(10, 30), false),
        ],
    );
    let today = consultation_date(days_from_today(0), true, &[(t(9, 0), t(9, 30), true)]);
    let past = consultation_date(days_from_today(-1), true, &[(t(9, 0), t(9, 30), true)]);
    let inactive = consultation_date(days_from_today(3), false, &[(t(9, 0), t(9, 30), true)]);

    for date in [later.clone(), past, inactive, today.clone()] {
        ctx.store.seed_consultation_date(date).await;
    }

    let response = ctx.server.get(DATES_PATH).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let listing = response.json::<ConsultationDatesResponse>();
    let ids: Vec<_> = listing.consultation_dates.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![today.id, later.id]);

    let later_slots: Vec<_> = listing.consultation_dates[1]
        .time_slots
        .iter()
        .map(|s| (s.start_time, s.is_available))
        .collect();
    assert_eq!(later_slots, vec![(t(8, 0), true), (t(14, 0), true)]);
}

#[tokio::test]
async fn test_create_returns_created_date_with_slots() {
    let ctx = TestContext::new();
    let date = days_from_today(10).format("%Y-%m-%d").to_string();

    let response = with_headers(ctx.server.post(DATES_PATH), ADMIN)
        .json(&two_slot_body(&date))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created = response.json::<CreateConsultationDateResponse>().consultation_date;
    assert_eq!(created.date, days_from_today(10));
    assert!(created.is_active);
    assert_eq!(created.time_slots.len(), 2);
    assert!(created.time_slots.iter().all(|s| s.is_available));
    assert!(created.time_slots.iter().all(|s| s.consultation_date_id == created.id));
    assert_eq!(ctx.store.slot_count().await, 2);
}

#[tokio::test]
async fn test_create_duplicate_date_is_rejected_without_writes() {
    let ctx = TestContext::new();
    let date = days_from_today(10).format("%Y-%m-%d").to_string();

    let first = with_headers(ctx.server.post(DATES_PATH), ADMIN)
        .json(&two_slot_body(&date))
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = with_headers(ctx.server.post(DATES_PATH), ADMIN)
        .json(&json!({
            "date": date,
            "timeSlots": [{ "startTime": "13:00", "endTime": "13:30" }]
        }))
        .await;

    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        second.json::<Value>(),
        json!({ "error": DUPLICATE_DATE_MESSAGE })
    );
    assert_eq!(ctx.store.all_consultation_dates().await.len(), 1);
    assert_eq!(ctx.store.slot_count().await, 2);
}

#[tokio::test]
async fn test_create_same_day_as_timestamp_is_a_duplicate() {
    let ctx = TestContext::new();
    let day = days_from_today(12);

    let first = with_headers(ctx.server.post(DATES_PATH), ADMIN)
        .json(&two_slot_body(&day.format("%Y-%m-%d").to_string()))
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = with_headers(ctx.server.post(DATES_PATH), ADMIN)
        .json(&two_slot_body(&format!("{}T15:00:00Z", day.format("%Y-%m-%d"))))
        .await;

    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_without_authorization_is_unauthorized() {
    let ctx = TestContext::new();
    let date = days_from_today(10).format("%Y-%m-%d").to_string();

    let response = with_headers(ctx.server.post(DATES_PATH), &[("x-user-role", "ADMIN")])
        .json(&two_slot_body(&date))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>(), json!({ "error": "Unauthorized" }));
    assert!(ctx.store.all_consultation_dates().await.is_empty());
}

#[rstest]
#[case::student(&[("authorization", "Bearer t"), ("x-user-role", "STUDENT")])]
#[case::staff(&[("authorization", "Bearer t"), ("x-user-role", "STAFF")])]
#[case::lowercase_admin(&[("authorization", "Bearer t"), ("x-user-role", "admin")])]
#[case::no_role(&[("authorization", "Bearer t")])]
#[case::basic_scheme(&[("authorization", "Basic dXNlcjpwYXNz"), ("x-user-role", "ADMIN")])]
#[tokio::test]
async fn test_create_requires_admin(#[case] headers: &'static [(&'static str, &'static str)]) {
    let ctx = TestContext::new();
    let date = days_from_today(10).format("%Y-%m-%d").to_string();

    let response = with_headers(ctx.server.post(DATES_PATH), headers)
        .json(&two_slot_body(&date))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(ctx.store.all_consultation_dates().await.is_empty());
}

#[tokio::test]
async fn test_authorization_is_checked_before_the_body() {
    let ctx = TestContext::new();

    let response = with_headers(ctx.server.post(DATES_PATH), &[("x-user-role", "STUDENT")])
        .text("not json")
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::empty_slots(json!({ "date": "2099-01-05", "timeSlots": [] }))]
#[case::missing_slots(json!({ "date": "2099-01-05" }))]
#[case::missing_date(json!({ "timeSlots": [{ "startTime": "09:00", "endTime": "09:30" }] }))]
#[case::slots_not_array(json!({ "date": "2099-01-05", "timeSlots": "09:00" }))]
#[case::bad_time(json!({ "date": "2099-01-05", "timeSlots": [{ "startTime": "nine", "endTime": "09:30" }] }))]
#[case::inverted_slot(json!({ "date": "2099-01-05", "timeSlots": [{ "startTime": "10:00", "endTime": "09:30" }] }))]
#[tokio::test]
async fn test_create_rejects_invalid_body(#[case] body: Value) {
    let ctx = TestContext::new();

    let response = with_headers(ctx.server.post(DATES_PATH), ADMIN)
        .json(&body)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(ctx.store.all_consultation_dates().await.is_empty());
}

#[tokio::test]
async fn test_create_rejects_non_json_body() {
    let ctx = TestContext::new();

    let response = with_headers(ctx.server.post(DATES_PATH), ADMIN)
        .text("date=2099-01-05")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_reflects_create_within_cache_window() {
    let ctx = TestContext::new();

    let before = ctx.server.get(DATES_PATH).await;
    assert!(before
        .json::<ConsultationDatesResponse>()
        .consultation_dates
        .is_empty());

    let date = days_from_today(5).format("%Y-%m-%d").to_string();
    let created = with_headers(ctx.server.post(DATES_PATH), ADMIN)
        .json(&two_slot_body(&date))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let after = ctx.server.get(DATES_PATH).await;
    let listing = after.json::<ConsultationDatesResponse>();
    assert_eq!(listing.consultation_dates.len(), 1);
    assert_eq!(listing.consultation_dates[0].date, days_from_today(5));
}

#[tokio::test]
async fn test_list_store_failure_is_generic_server_error() {
    let mut store = MockConsultationStore::new();
    store
        .expect_list_upcoming()
        .returning(|_| Err(ClinicError::Database(eyre::eyre!("connection refused (os error 111)"))));
    let server = build_server(Arc::new(store), Arc::new(MemoryStore::new()));

    let response = server.get(DATES_PATH).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": GENERIC_STORE_ERROR }));
}

#[tokio::test]
async fn test_create_losing_a_race_is_a_conflict_not_a_server_error() {
    let day = days_from_today(20);
    let mut store = MockConsultationStore::new();
    store
        .expect_find_by_date()
        .with(predicate::eq(day))
        .returning(|_| Ok(None));
    store
        .expect_create_with_slots()
        .times(1)
        .returning(|_, _| Err(ClinicError::Conflict(DUPLICATE_DATE_MESSAGE.to_string())));
    let server = build_server(Arc::new(store), Arc::new(MemoryStore::new()));

    let response = with_headers(server.post(DATES_PATH), ADMIN)
        .json(&two_slot_body(&day.format("%Y-%m-%d").to_string()))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_store_failure_is_generic_server_error() {
    let mut store = MockConsultationStore::new();
    store.expect_find_by_date().returning(|_| Ok(None));
    store.expect_create_with_slots().returning(|_, _| {
        Err(ClinicError::Database(eyre::eyre!(
            "violates check constraint \"valid_time_range\""
        )))
    });
    let server = build_server(Arc::new(store), Arc::new(MemoryStore::new()));

    let response = with_headers(server.post(DATES_PATH), ADMIN)
        .json(&two_slot_body(&days_from_today(9).format("%Y-%m-%d").to_string()))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": GENERIC_STORE_ERROR }));
}
