#![allow(clippy::unused_async)]
//! Integration tests for storage permission failures.
//!
//! Tests:
//! - A role without write privileges gets a final 403 on append

use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

/// ## Summary
/// The database refuses the insert, so the request fails with
/// `permission_denied` and nothing is stored.
#[test_log::test(tokio::test)]
async fn append_without_insert_privilege_is_forbidden() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db.seed_patient("Ada Lovelace").await.expect("seed");
    let read_only_url = test_db.read_only_url().await.expect("read-only role");
    let service = create_db_test_service(&read_only_url).await;

    // Reads still work for the role.
    TestRequest::get(&patient_events_path(patient_id))
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    let body = TestRequest::post(&patient_events_path(patient_id))
        .json_body(&json!({
            "kind": "drink",
            "occurred_at": "2024-03-01T08:00:00Z",
            "fields": { "volume_ml": 250 }
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_code("permission_denied")
        .json();
    assert_eq!(body["retryable"], false);

    assert_eq!(test_db.count_events(patient_id).await.expect("count"), 0);
}
