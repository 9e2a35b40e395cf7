//! ## Summary
//! Care event endpoints.
//!
//! - `POST   /patients/{patient_id}/events` appends an event
//! - `GET    /patients/{patient_id}/events` lists a patient's timeline
//! - `GET    /events/{event_id}` reads one event
//! - `DELETE /events/{event_id}` removes an erroneous event

use chrono::{DateTime, Utc};
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use medicare_core::constants::EVENTS_ROUTE_COMPONENT;
use medicare_core::event::NewCareEvent;
use medicare_core::types::{EventOrder, OrderBy, SortDirection};
use medicare_service::care_event::{self as event_service, EventQuery, RemoveOutcome};
use medicare_service::error::ServiceError;

use super::request::{json_body, path_uuid, query_param};
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;

/// Event submission; the patient comes from the path.
#[derive(Debug, Deserialize)]
struct AppendEventRequest {
    kind: String,
    occurred_at: DateTime<Utc>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    created_by: Option<uuid::Uuid>,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct AppendEventResponse {
    id: uuid::Uuid,
    created_at: DateTime<Utc>,
}

/// ## Summary
/// POST /patients/{patient_id}/events - validates and stores an event.
///
/// ## Errors
/// Returns HTTP 422 naming the offending field or kind, HTTP 404 for an
/// unknown patient and HTTP 503 when the database is unreachable.
#[handler]
async fn append_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = append_event_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn append_event_inner(req: &mut Request, depot: &Depot, res: &mut Response) -> AppResult<()> {
    let patient_id = path_uuid(req, "patient_id")?;
    let body: AppendEventRequest = json_body(req).await?;

    let new_event = NewCareEvent {
        patient_id,
        kind: body.kind,
        occurred_at: body.occurred_at,
        notes: body.notes,
        created_by: body.created_by,
        fields: body.fields,
    };

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let event = event_service::append_event(&mut conn, &new_event).await?;

    res.status_code(StatusCode::CREATED);
    res.render(Json(AppendEventResponse {
        id: event.id,
        created_at: event.created_at,
    }));
    Ok(())
}

/// ## Summary
/// GET /patients/{patient_id}/events - lists a patient's events.
///
/// Query parameters: `order_by` (`occurred_at` | `created_at`), `direction`
/// (`asc` | `desc`), `kind`, `occurred_after`, `occurred_before` (RFC 3339)
/// and `limit`.
#[handler]
async fn list_events(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = list_events_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn list_events_inner(req: &Request, depot: &Depot, res: &mut Response) -> AppResult<()> {
    let patient_id = path_uuid(req, "patient_id")?;
    let by = query_param(req, "order_by", OrderBy::parse)?.unwrap_or_default();
    let direction = query_param(req, "direction", SortDirection::parse)?.unwrap_or_default();
    let kind = query_param(req, "kind", |raw| Some(raw.to_owned()))?;
    let after = query_param(req, "occurred_after", parse_timestamp)?;
    let before = query_param(req, "occurred_before", parse_timestamp)?;
    let limit = query_param(req, "limit", |raw| raw.parse::<u16>().ok())?;

    let config = get_config_from_depot(depot)?;
    let limit = config.events.page_size(limit);

    let mut query = EventQuery::new(patient_id, EventOrder::new(by, direction))
        .with_page_size(limit)
        .occurred_between(after, before);
    if let Some(kind) = kind {
        query = query.with_kind(kind);
    }

    let provider = get_db_from_depot(depot)?;
    let listing = event_service::list_by_patient(provider.as_ref(), &query).await?;
    let events = listing.take(usize::from(limit)).await?;

    res.render(Json(events));
    Ok(())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[handler]
async fn get_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = get_event_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn get_event_inner(req: &Request, depot: &Depot, res: &mut Response) -> AppResult<()> {
    let event_id = path_uuid(req, "event_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let event = event_service::get_event(&mut conn, event_id).await?;

    res.render(Json(event));
    Ok(())
}

/// ## Summary
/// DELETE /events/{event_id} - hard deletes an erroneous event.
///
/// ## Errors
/// Returns HTTP 404 if the event does not exist, including when it was
/// already removed.
#[handler]
async fn remove_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = remove_event_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn remove_event_inner(req: &Request, depot: &Depot, res: &mut Response) -> AppResult<()> {
    let event_id = path_uuid(req, "event_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    match event_service::remove_event(&mut conn, event_id).await? {
        RemoveOutcome::Removed => {
            res.status_code(StatusCode::NO_CONTENT);
            Ok(())
        }
        RemoveOutcome::AlreadyGone => {
            Err(ServiceError::NotFound(format!("event {event_id}")).into())
        }
    }
}

/// Routes nested under `/patients/{patient_id}`.
#[must_use]
pub fn patient_routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT)
        .get(list_events)
        .post(append_event)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT).push(
        Router::with_path("{event_id}")
            .get(get_event)
            .delete(remove_event),
    )
}
