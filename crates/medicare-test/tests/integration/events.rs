#![allow(clippy::unused_async)]
//! Integration tests for recording and removing care events.
//!
//! Tests:
//! - Appended events come back from the timeline with the same fields
//! - Rejected submissions leave nothing behind
//! - Clinical bounds on mood and meal consumption
//! - Removal and repeated removal

use salvo::http::StatusCode;
use serde_json::{Value, json};

use super::helpers::*;

async fn append(
    service: &salvo::Service,
    patient_id: uuid::Uuid,
    body: &Value,
) -> TestResponse {
    TestRequest::post(&patient_events_path(patient_id))
        .json_body(body)
        .send(service)
        .await
}

fn event_id(response: &TestResponse) -> uuid::Uuid {
    let body = response.json();
    body["id"]
        .as_str()
        .and_then(|id| uuid::Uuid::parse_str(id).ok())
        .expect("response carries the event id")
}

/// ## Summary
/// An appended drink is listed back with identical field values.
#[test_log::test(tokio::test)]
async fn append_then_list_round_trips_fields() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db
        .seed_patient("Ada Lovelace")
        .await
        .expect("Failed to seed patient");
    let service = create_db_test_service(&test_db.url()).await;

    let response = append(
        &service,
        patient_id,
        &json!({
            "kind": "drink",
            "occurred_at": "2024-03-01T08:30:00Z",
            "notes": "with breakfast",
            "fields": { "volume_ml": 250, "liquid_type": "water" }
        }),
    )
    .await
    .assert_status(StatusCode::CREATED);
    let id = event_id(&response);
    assert!(response.json()["created_at"].is_string());

    let listed = TestRequest::get(&patient_events_path(patient_id))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let events = listed.as_array().expect("list is an array");
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["id"], id.to_string());
    assert_eq!(event["kind"], "drink");
    assert_eq!(event["volume_ml"], 250);
    assert_eq!(event["liquid_type"], "water");
    assert_eq!(event["notes"], "with breakfast");
    assert_eq!(event["patient_id"], patient_id.to_string());
}

/// ## Summary
/// The later observation comes first in the default timeline regardless of
/// entry order, and last when ascending.
#[test_log::test(tokio::test)]
async fn timeline_orders_by_occurrence() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db
        .seed_patient("Grace Hopper")
        .await
        .expect("Failed to seed patient");
    let service = create_db_test_service(&test_db.url()).await;

    // Entered out of order on purpose.
    let later = append(
        &service,
        patient_id,
        &json!({ "kind": "mood", "occurred_at": "2024-03-01T12:00:00Z", "fields": { "mood_scale": 7 } }),
    )
    .await
    .assert_status(StatusCode::CREATED);
    let earlier = append(
        &service,
        patient_id,
        &json!({ "kind": "mood", "occurred_at": "2024-03-01T09:00:00Z", "fields": { "mood_scale": 4 } }),
    )
    .await
    .assert_status(StatusCode::CREATED);
    let (later, earlier) = (event_id(&later), event_id(&earlier));

    let desc = TestRequest::get(&patient_events_path(patient_id))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let ids: Vec<&str> = desc
        .as_array()
        .expect("list is an array")
        .iter()
        .filter_map(|e| e["id"].as_str())
        .collect();
    assert_eq!(ids, vec![later.to_string(), earlier.to_string()]);

    let asc = TestRequest::get(&format!(
        "{}?order_by=occurred_at&direction=asc",
        patient_events_path(patient_id)
    ))
    .send(&service)
    .await
    .assert_status(StatusCode::OK)
    .json();
    let ids: Vec<&str> = asc
        .as_array()
        .expect("list is an array")
        .iter()
        .filter_map(|e| e["id"].as_str())
        .collect();
    assert_eq!(ids, vec![earlier.to_string(), later.to_string()]);
}

#[test_log::test(tokio::test)]
async fn unknown_kind_is_rejected_and_not_stored() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db
        .seed_patient("Alan Turing")
        .await
        .expect("Failed to seed patient");
    let service = create_db_test_service(&test_db.url()).await;

    let body = append(
        &service,
        patient_id,
        &json!({ "kind": "levitation", "occurred_at": "2024-03-01T08:30:00Z", "fields": {} }),
    )
    .await
    .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
    .assert_error_code("unknown_kind")
    .json();
    assert_eq!(body["kind"], "levitation");
    assert_eq!(body["retryable"], false);

    assert_eq!(test_db.count_events(patient_id).await.expect("count"), 0);
}

#[test_log::test(tokio::test)]
async fn field_of_another_kind_is_rejected() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db
        .seed_patient("Alan Turing")
        .await
        .expect("Failed to seed patient");
    let service = create_db_test_service(&test_db.url()).await;

    let body = append(
        &service,
        patient_id,
        &json!({
            "kind": "drink",
            "occurred_at": "2024-03-01T08:30:00Z",
            "fields": { "volume_ml": 200, "mood_scale": 5 }
        }),
    )
    .await
    .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
    .assert_error_code("field_not_allowed")
    .json();
    assert_eq!(body["field"], "mood_scale");

    assert_eq!(test_db.count_events(patient_id).await.expect("count"), 0);
}

/// ## Summary
/// Mood scores outside 1..=10 are rejected with the violated bound.
#[test_log::test(tokio::test)]
async fn mood_scale_bounds() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db
        .seed_patient("Mary Seacole")
        .await
        .expect("Failed to seed patient");
    let service = create_db_test_service(&test_db.url()).await;

    for (score, side, limit) in [(0, "min", 1), (11, "max", 10)] {
        let body = append(
            &service,
            patient_id,
            &json!({ "kind": "mood", "occurred_at": "2024-03-01T08:30:00Z", "fields": { "mood_scale": score } }),
        )
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_code("field_range")
        .json();
        assert_eq!(body["field"], "mood_scale");
        assert_eq!(body["bound"], json!({ "side": side, "value": limit }));
    }

    for score in [1, 10] {
        append(
            &service,
            patient_id,
            &json!({ "kind": "mood", "occurred_at": "2024-03-01T08:30:00Z", "fields": { "mood_scale": score } }),
        )
        .await
        .assert_status(StatusCode::CREATED);
    }

    assert_eq!(test_db.count_events(patient_id).await.expect("count"), 2);
}

#[test_log::test(tokio::test)]
async fn meal_consumption_bounds() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db
        .seed_patient("Mary Seacole")
        .await
        .expect("Failed to seed patient");
    let service = create_db_test_service(&test_db.url()).await;

    for pct in [-1, 101] {
        append(
            &service,
            patient_id,
            &json!({
                "kind": "meal",
                "occurred_at": "2024-03-01T12:30:00Z",
                "fields": { "meal_type": "lunch", "consumption_percentage": pct }
            }),
        )
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_code("field_range");
    }

    append(
        &service,
        patient_id,
        &json!({
            "kind": "meal",
            "occurred_at": "2024-03-01T12:30:00Z",
            "fields": { "meal_type": "supper", "consumption_percentage": 50 }
        }),
    )
    .await
    .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
    .assert_error_code("field_not_in_set");

    assert_eq!(test_db.count_events(patient_id).await.expect("count"), 0);
}

/// ## Summary
/// Temperatures are kept to one decimal place.
#[test_log::test(tokio::test)]
async fn vital_signs_are_normalized() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db
        .seed_patient("Florence Nightingale")
        .await
        .expect("Failed to seed patient");
    let service = create_db_test_service(&test_db.url()).await;

    let response = append(
        &service,
        patient_id,
        &json!({
            "kind": "vital_signs",
            "occurred_at": "2024-03-01T07:00:00Z",
            "fields": { "heart_rate": "72", "temperature": 37.24 }
        }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let event = TestRequest::get(&event_path(event_id(&response)))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(event["heart_rate"], 72);
    assert_eq!(event["temperature"], 37.2);
    assert!(event.get("systolic_bp").is_none());
}

#[test_log::test(tokio::test)]
async fn append_for_unknown_patient_is_not_found() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let service = create_db_test_service(&test_db.url()).await;

    append(
        &service,
        uuid::Uuid::now_v7(),
        &json!({ "kind": "drink", "occurred_at": "2024-03-01T08:30:00Z", "fields": { "volume_ml": 100 } }),
    )
    .await
    .assert_status(StatusCode::NOT_FOUND)
    .assert_error_code("not_found");
}

/// ## Summary
/// A removed event is gone from the timeline, and removing it again reports
/// that nothing was there.
#[test_log::test(tokio::test)]
async fn remove_then_remove_again() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db
        .seed_patient("Ada Lovelace")
        .await
        .expect("Failed to seed patient");
    let service = create_db_test_service(&test_db.url()).await;

    let response = append(
        &service,
        patient_id,
        &json!({ "kind": "bathroom", "occurred_at": "2024-03-01T10:00:00Z", "fields": { "bathroom_type": "urine" } }),
    )
    .await
    .assert_status(StatusCode::CREATED);
    let id = event_id(&response);

    TestRequest::delete(&event_path(id))
        .send(&service)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    TestRequest::delete(&event_path(id))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    TestRequest::get(&event_path(id))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert_eq!(test_db.count_events(patient_id).await.expect("count"), 0);
}

/// ## Summary
/// Fields of a kind registered at runtime are stored and listed like
/// builtin ones.
#[test_log::test(tokio::test)]
async fn runtime_kind_fields_round_trip() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db
        .seed_patient("Ada Lovelace")
        .await
        .expect("Failed to seed patient");
    let service = create_db_test_service(&test_db.url()).await;

    TestRequest::post(medicare_test::app::api::KINDS_ROUTE_PREFIX)
        .json_body(&json!({
            "name": "wound_care",
            "schema": { "fields": {
                "wound_site": { "type": "text", "max_len": 100 },
                "size_mm": { "type": "integer", "min": 0, "max": 500 }
            } }
        }))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);

    append(
        &service,
        patient_id,
        &json!({
            "kind": "wound_care",
            "occurred_at": "2024-03-02T09:00:00Z",
            "fields": { "wound_site": "left heel", "size_mm": 12 }
        }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let listed = TestRequest::get(&format!("{}?kind=wound_care", patient_events_path(patient_id)))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let events = listed.as_array().expect("list is an array");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["kind"], "wound_care");
    assert_eq!(events[0]["wound_site"], "left heel");
    assert_eq!(events[0]["size_mm"], 12);
}
