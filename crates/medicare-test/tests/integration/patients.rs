#![allow(clippy::unused_async)]
//! Integration tests for patient management.
//!
//! Tests:
//! - Create, read, list by owner and full replace
//! - Deleting a patient removes its timeline

use salvo::http::StatusCode;
use serde_json::json;

use medicare_test::app::api::PATIENTS_ROUTE_PREFIX;

use super::helpers::*;

fn patient_path(patient_id: &str) -> String {
    format!("{PATIENTS_ROUTE_PREFIX}/{patient_id}")
}

#[test_log::test(tokio::test)]
async fn create_read_and_replace() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let service = create_db_test_service(&test_db.url()).await;
    let owner_id = uuid::Uuid::now_v7();

    let created = TestRequest::post(PATIENTS_ROUTE_PREFIX)
        .json_body(&json!({
            "owner_id": owner_id,
            "full_name": "  Ada Lovelace ",
            "birth_date": "1815-12-10",
            "gender": "female",
            "allergies": "penicillin",
            "phone": "   "
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    let id = created["id"].as_str().expect("patient id").to_string();
    assert_eq!(created["full_name"], "Ada Lovelace");
    assert_eq!(created["gender"], "female");
    assert_eq!(created["phone"], serde_json::Value::Null);

    let read = TestRequest::get(&patient_path(&id))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(read["birth_date"], "1815-12-10");
    assert_eq!(read["allergies"], "penicillin");

    // A full replace clears what is omitted.
    let replaced = TestRequest::put(&patient_path(&id))
        .json_body(&json!({ "full_name": "Augusta Ada King", "notes": "prefers tea" }))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(replaced["full_name"], "Augusta Ada King");
    assert_eq!(replaced["notes"], "prefers tea");
    assert_eq!(replaced["allergies"], serde_json::Value::Null);
    assert_eq!(replaced["birth_date"], serde_json::Value::Null);
}

#[test_log::test(tokio::test)]
async fn list_is_scoped_to_owner() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let service = create_db_test_service(&test_db.url()).await;
    let owner_id = uuid::Uuid::now_v7();

    test_db
        .seed_patient_for(owner_id, "Zora Neale")
        .await
        .expect("seed");
    test_db
        .seed_patient_for(owner_id, "Alan Turing")
        .await
        .expect("seed");
    test_db.seed_patient("Someone Else").await.expect("seed");

    let listed = TestRequest::get(&format!("{PATIENTS_ROUTE_PREFIX}?owner_id={owner_id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let names: Vec<&str> = listed
        .as_array()
        .expect("list is an array")
        .iter()
        .filter_map(|p| p["full_name"].as_str())
        .collect();
    assert_eq!(names, vec!["Alan Turing", "Zora Neale"]);

    TestRequest::get(PATIENTS_ROUTE_PREFIX)
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn invalid_profiles_are_rejected() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let service = create_db_test_service(&test_db.url()).await;

    TestRequest::post(PATIENTS_ROUTE_PREFIX)
        .json_body(&json!({ "owner_id": uuid::Uuid::now_v7(), "full_name": "   " }))
        .send(&service)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_code("invalid_input");

    TestRequest::get(&patient_path("not-a-uuid"))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::get(&patient_path(&uuid::Uuid::now_v7().to_string()))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// Deleting a patient takes its events with it.
#[test_log::test(tokio::test)]
async fn delete_cascades_to_events() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db.seed_patient("Ada Lovelace").await.expect("seed");
    let service = create_db_test_service(&test_db.url()).await;

    TestRequest::post(&patient_events_path(patient_id))
        .json_body(&json!({
            "kind": "medication",
            "occurred_at": "2024-03-01T08:00:00Z",
            "fields": { "medication_name": "paracetamol", "dose": "500 mg", "route": "oral" }
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(test_db.count_events(patient_id).await.expect("count"), 1);

    TestRequest::delete(&patient_path(&patient_id.to_string()))
        .send(&service)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert_eq!(test_db.count_events(patient_id).await.expect("count"), 0);

    TestRequest::get(&patient_events_path(patient_id))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
