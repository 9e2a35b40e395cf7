//! ## Summary
//! Care event store: append, list and remove.
//!
//! Every submission is validated against the registry before anything is
//! written, and the write itself is a single-row transaction. A failed
//! validation therefore never leaves a partial row behind.

use diesel_async::scoped_futures::ScopedFutureExt;
use medicare_core::error::ValidationError;
use medicare_core::event::{CareEvent, NewCareEvent};
use medicare_core::kind::EventKind;
use medicare_db::db::DbProvider;
use medicare_db::db::connection::DbConnection;
use medicare_db::db::query::{care_event, patient};
use medicare_db::db::transaction::with_transaction;
use medicare_db::error::{DbError, constraint};
use medicare_db::model::care_event::NewCareEventRow;

use super::listing::{EventListing, EventQuery};
use crate::error::{ServiceError, ServiceResult};
use crate::kinds::service::load_registry;

/// Result of a removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// No event with that id exists; nothing was changed.
    AlreadyGone,
}

/// ## Summary
/// Validates and stores a new care event.
///
/// The id (UUIDv7) is assigned here and `created_at` by the database.
///
/// ## Side Effects
/// Inserts one `care_event` row.
///
/// ## Errors
/// - `UnknownKind` if the kind is not registered, including a kind removed
///   from under a concurrent request
/// - any field validation error
/// - `NotFound` if the patient does not exist
/// - storage errors, which callers may retry when marked retryable
#[tracing::instrument(skip(conn, new_event), fields(patient_id = %new_event.patient_id, kind = %new_event.kind))]
pub async fn append_event(
    conn: &mut DbConnection<'_>,
    new_event: &NewCareEvent,
) -> ServiceResult<CareEvent> {
    let registry = load_registry(conn).await?;
    let fields = registry.validate(&new_event.kind, &new_event.fields)?;
    let kind = EventKind::parse(&new_event.kind);

    let row = NewCareEventRow::build(
        uuid::Uuid::now_v7(),
        new_event.patient_id,
        &kind,
        new_event.occurred_at,
        new_event.normalized_notes(),
        new_event.created_by,
        fields,
    )?;

    let inserted = with_transaction(conn, move |tx| {
        async move { care_event::insert(tx, &row).await.map_err(DbError::from) }.scope_boxed()
    })
    .await
    .map_err(|err| map_insert_error(err, new_event))?;

    let event = inserted.into_event()?;
    tracing::debug!(event_id = %event.id, "Care event appended");
    Ok(event)
}

fn map_insert_error(err: DbError, new_event: &NewCareEvent) -> ServiceError {
    match err.violated_constraint() {
        Some(constraint::CARE_EVENT_KIND_FKEY) => {
            ValidationError::UnknownKind(new_event.kind.clone()).into()
        }
        Some(constraint::CARE_EVENT_PATIENT_FKEY) => {
            ServiceError::NotFound(format!("patient {}", new_event.patient_id))
        }
        _ => {
            tracing::warn!(error = %err, retryable = err.is_retryable(), "Care event insert failed");
            err.into()
        }
    }
}

/// ## Errors
/// Returns `NotFound` if no such event exists, or a storage error.
#[tracing::instrument(skip(conn))]
pub async fn get_event(conn: &mut DbConnection<'_>, event_id: uuid::Uuid) -> ServiceResult<CareEvent> {
    let row = care_event::get(conn, event_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("event {event_id}")))?;
    Ok(row.into_event()?)
}

/// ## Summary
/// Lists a patient's events lazily.
///
/// The patient is checked up front; rows are only fetched once the returned
/// listing is streamed.
///
/// ## Errors
/// Returns `NotFound` if the patient does not exist, or a storage error.
#[tracing::instrument(skip(provider, query), fields(patient_id = %query.patient_id, order_by = %query.order.by))]
pub async fn list_by_patient<'a>(
    provider: &'a dyn DbProvider,
    query: &EventQuery,
) -> ServiceResult<EventListing<'a>> {
    let mut conn = provider.get_connection().await?;
    if patient::get(&mut conn, query.patient_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("patient {}", query.patient_id)));
    }
    Ok(EventListing::new(provider, query))
}

/// ## Summary
/// Hard deletes an event. Meant for correcting erroneous entries only.
///
/// Removing an id that does not exist changes nothing and reports
/// [`RemoveOutcome::AlreadyGone`].
///
/// ## Errors
/// Returns a storage error if the delete fails.
#[tracing::instrument(skip(conn))]
pub async fn remove_event(
    conn: &mut DbConnection<'_>,
    event_id: uuid::Uuid,
) -> ServiceResult<RemoveOutcome> {
    let deleted = care_event::delete(conn, event_id).await?;
    if deleted == 0 {
        tracing::debug!("Event already gone");
        return Ok(RemoveOutcome::AlreadyGone);
    }
    tracing::info!("Care event removed");
    Ok(RemoveOutcome::Removed)
}
