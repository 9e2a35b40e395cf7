//! Queries over the `care_event` table.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use medicare_core::types::{EventOrder, OrderBy, SortDirection};

use crate::db::connection::DbConnection;
use crate::db::schema::care_event;
use crate::model::care_event::{CareEventRow, NewCareEventRow};

/// Restricts a patient listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub patient_id: uuid::Uuid,
    pub kind: Option<String>,
    /// Inclusive lower bound on `occurred_at`.
    pub occurred_after: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `occurred_at`.
    pub occurred_before: Option<DateTime<Utc>>,
}

/// Position of the last row of a page in `(order column, id)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub position: DateTime<Utc>,
    pub id: uuid::Uuid,
}

impl Cursor {
    #[must_use]
    pub fn after(row: &CareEventRow, by: OrderBy) -> Self {
        let position = match by {
            OrderBy::OccurredAt => row.occurred_at,
            OrderBy::CreatedAt => row.created_at,
        };
        Self { position, id: row.id }
    }
}

/// ## Summary
/// Inserts an event row and returns it with its database-assigned `created_at`.
///
/// ## Errors
/// Returns a database error on constraint violation or connection failure.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    row: &NewCareEventRow,
) -> diesel::QueryResult<CareEventRow> {
    diesel::insert_into(care_event::table)
        .values(row)
        .returning(CareEventRow::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Returns a query to find an event by ID.
#[must_use]
pub fn by_id(id: uuid::Uuid) -> care_event::BoxedQuery<'static, diesel::pg::Pg> {
    care_event::table.filter(care_event::id.eq(id)).into_boxed()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn get(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
) -> diesel::QueryResult<Option<CareEventRow>> {
    by_id(id)
        .select(CareEventRow::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Hard deletes an event.
///
/// ## Returns
/// The number of deleted rows, `0` if the event did not exist.
///
/// ## Errors
/// Returns a database error if the statement fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> diesel::QueryResult<usize> {
    diesel::delete(care_event::table.filter(care_event::id.eq(id)))
        .execute(conn)
        .await
}

/// Applies the keyset predicate and the `(column, id)` ordering for one
/// order column and direction.
macro_rules! keyset {
    ($query:expr, $column:expr, $after:expr, $cmp:ident, $dir:ident) => {{
        let mut query = $query;
        if let Some(cursor) = $after {
            query = query.filter(
                $column
                    .$cmp(cursor.position)
                    .or($column.eq(cursor.position).and(care_event::id.$cmp(cursor.id))),
            );
        }
        query.order(($column.$dir(), care_event::id.$dir()))
    }};
}

/// ## Summary
/// Loads one page of a patient's events.
///
/// Rows are ordered by the order column with `id` breaking ties, so pages
/// never skip or repeat a row even when timestamps collide.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_page(
    conn: &mut DbConnection<'_>,
    filter: &EventFilter,
    order: EventOrder,
    after: Option<Cursor>,
    limit: i64,
) -> diesel::QueryResult<Vec<CareEventRow>> {
    let mut query = care_event::table
        .filter(care_event::patient_id.eq(filter.patient_id))
        .select(CareEventRow::as_select())
        .into_boxed();

    if let Some(kind) = &filter.kind {
        query = query.filter(care_event::kind.eq(kind.clone()));
    }
    if let Some(from) = filter.occurred_after {
        query = query.filter(care_event::occurred_at.ge(from));
    }
    if let Some(until) = filter.occurred_before {
        query = query.filter(care_event::occurred_at.lt(until));
    }

    let query = match (order.by, order.direction) {
        (OrderBy::OccurredAt, SortDirection::Asc) => {
            keyset!(query, care_event::occurred_at, after, gt, asc)
        }
        (OrderBy::OccurredAt, SortDirection::Desc) => {
            keyset!(query, care_event::occurred_at, after, lt, desc)
        }
        (OrderBy::CreatedAt, SortDirection::Asc) => {
            keyset!(query, care_event::created_at, after, gt, asc)
        }
        (OrderBy::CreatedAt, SortDirection::Desc) => {
            keyset!(query, care_event::created_at, after, lt, desc)
        }
    };

    query.limit(limit).load(conn).await
}
