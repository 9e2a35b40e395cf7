#![allow(clippy::unused_async)]
//! Integration tests for timeline listing at the service layer.
//!
//! Tests:
//! - Keyset paging visits every event exactly once in order
//! - Listings restart from the first row
//! - Kind and time window filters
//! - Removal reports `AlreadyGone` on repeat

use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::TryStreamExt;
use serde_json::{Map, json};

use medicare_test::component::event::NewCareEvent;
use medicare_test::component::types::{EventOrder, OrderBy, SortDirection};
use medicare_test::component::service::care_event::{
    EventQuery, RemoveOutcome, append_event, list_by_patient, remove_event,
};
use medicare_test::component::service::error::ServiceError;

use super::helpers::*;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn drink_at(patient_id: uuid::Uuid, occurred_at: DateTime<Utc>, volume_ml: i64) -> NewCareEvent {
    let mut fields = Map::new();
    fields.insert("volume_ml".to_string(), json!(volume_ml));
    NewCareEvent {
        patient_id,
        kind: "drink".to_string(),
        occurred_at,
        notes: None,
        created_by: None,
        fields,
    }
}

/// Appends `count` drinks an hour apart and returns their ids in
/// occurrence order.
async fn seed_drinks(test_db: &TestDb, patient_id: uuid::Uuid, count: i64) -> Vec<uuid::Uuid> {
    let mut conn = test_db.get_conn().await.expect("connection");
    let mut ids = Vec::new();
    for i in 0..count {
        let event = append_event(
            &mut conn,
            &drink_at(patient_id, base_time() + Duration::hours(i), 100 + i),
        )
        .await
        .expect("append drink");
        ids.push(event.id);
    }
    ids
}

/// ## Summary
/// A listing smaller than one page boundary still yields every event once,
/// in order, across several pages.
#[test_log::test(tokio::test)]
async fn pages_cover_every_event_once() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db.seed_patient("Ada Lovelace").await.expect("seed");
    let ids = seed_drinks(&test_db, patient_id, 7).await;

    let query = EventQuery::new(
        patient_id,
        EventOrder::new(OrderBy::OccurredAt, SortDirection::Asc),
    )
    .with_page_size(3);
    let listing = list_by_patient(test_db.provider(), &query)
        .await
        .expect("patient exists");

    let pages: Vec<Vec<_>> = listing.pages().try_collect().await.expect("pages");
    let sizes: Vec<usize> = pages.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![3, 3, 1]);

    let listed: Vec<uuid::Uuid> = pages.into_iter().flatten().map(|e| e.id).collect();
    assert_eq!(listed, ids);
}

#[test_log::test(tokio::test)]
async fn descending_listing_and_restart() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db.seed_patient("Ada Lovelace").await.expect("seed");
    let mut ids = seed_drinks(&test_db, patient_id, 5).await;
    ids.reverse();

    let query = EventQuery::new(patient_id, EventOrder::default()).with_page_size(2);
    let listing = list_by_patient(test_db.provider(), &query)
        .await
        .expect("patient exists");

    let first: Vec<uuid::Uuid> = listing
        .collect_all()
        .await
        .expect("listing")
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(first, ids);

    // A second pass starts over rather than resuming.
    let again: Vec<uuid::Uuid> = listing
        .stream()
        .map_ok(|e| e.id)
        .try_collect()
        .await
        .expect("listing");
    assert_eq!(again, ids);

    let top = listing.take(2).await.expect("listing");
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].id, ids[0]);
}

/// ## Summary
/// Events recorded in the same instant are still paged without skipping or
/// repeating, since ties break on id.
#[test_log::test(tokio::test)]
async fn ties_on_occurrence_are_paged_stably() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db.seed_patient("Ada Lovelace").await.expect("seed");

    let mut conn = test_db.get_conn().await.expect("connection");
    let mut ids = Vec::new();
    for volume in [100, 200, 300, 400] {
        let event = append_event(&mut conn, &drink_at(patient_id, base_time(), volume))
            .await
            .expect("append");
        ids.push(event.id);
    }
    drop(conn);
    ids.sort();

    let query = EventQuery::new(
        patient_id,
        EventOrder::new(OrderBy::OccurredAt, SortDirection::Asc),
    )
    .with_page_size(1);
    let listing = list_by_patient(test_db.provider(), &query)
        .await
        .expect("patient exists");
    let listed: Vec<uuid::Uuid> = listing
        .collect_all()
        .await
        .expect("listing")
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(listed, ids);
}

#[test_log::test(tokio::test)]
async fn kind_and_window_filters() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db.seed_patient("Ada Lovelace").await.expect("seed");
    let drinks = seed_drinks(&test_db, patient_id, 4).await;

    let mut conn = test_db.get_conn().await.expect("connection");
    let mut mood = Map::new();
    mood.insert("mood_scale".to_string(), json!(6));
    append_event(
        &mut conn,
        &NewCareEvent {
            patient_id,
            kind: "mood".to_string(),
            occurred_at: base_time() + Duration::minutes(30),
            notes: None,
            created_by: None,
            fields: mood,
        },
    )
    .await
    .expect("append mood");
    drop(conn);

    let query = EventQuery::new(
        patient_id,
        EventOrder::new(OrderBy::OccurredAt, SortDirection::Asc),
    )
    .with_kind("drink")
    .occurred_between(
        Some(base_time() + Duration::hours(1)),
        Some(base_time() + Duration::hours(3)),
    );
    let listing = list_by_patient(test_db.provider(), &query)
        .await
        .expect("patient exists");
    let listed: Vec<uuid::Uuid> = listing
        .collect_all()
        .await
        .expect("listing")
        .into_iter()
        .map(|e| e.id)
        .collect();

    // The lower bound is inclusive and the upper bound exclusive.
    assert_eq!(listed, drinks[1..3].to_vec());
}

#[test_log::test(tokio::test)]
async fn listing_unknown_patient_is_not_found() {
    let test_db = TestDb::new().await.expect("Failed to create test database");

    let query = EventQuery::new(uuid::Uuid::now_v7(), EventOrder::default());
    let result = list_by_patient(test_db.provider(), &query).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[test_log::test(tokio::test)]
async fn remove_reports_already_gone() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let patient_id = test_db.seed_patient("Ada Lovelace").await.expect("seed");
    let ids = seed_drinks(&test_db, patient_id, 1).await;

    let mut conn = test_db.get_conn().await.expect("connection");
    assert_eq!(
        remove_event(&mut conn, ids[0]).await.expect("remove"),
        RemoveOutcome::Removed
    );
    assert_eq!(
        remove_event(&mut conn, ids[0]).await.expect("remove"),
        RemoveOutcome::AlreadyGone
    );
}
