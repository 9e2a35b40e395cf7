//! Queries over the `event_kind` registry table.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::event_kind;
use crate::model::event_kind::{EventKindRow, NewEventKind};

/// ## Errors
/// Returns a database error if the query fails.
pub async fn all(conn: &mut DbConnection<'_>) -> diesel::QueryResult<Vec<EventKindRow>> {
    event_kind::table
        .select(EventKindRow::as_select())
        .order(event_kind::name.asc())
        .load(conn)
        .await
}

/// ## Summary
/// Reads a kind and locks its row until the surrounding transaction ends.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_for_update(
    conn: &mut DbConnection<'_>,
    name: &str,
) -> diesel::QueryResult<Option<EventKindRow>> {
    event_kind::table
        .find(name)
        .select(EventKindRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Inserts a kind unless a row with the same name already exists.
///
/// ## Returns
/// `1` if the row was inserted, `0` if another writer got there first.
///
/// ## Errors
/// Returns a database error if the statement fails.
pub async fn insert_if_absent(
    conn: &mut DbConnection<'_>,
    kind: &NewEventKind,
) -> diesel::QueryResult<usize> {
    diesel::insert_into(event_kind::table)
        .values(kind)
        .on_conflict(event_kind::name)
        .do_nothing()
        .execute(conn)
        .await
}

/// ## Summary
/// Replaces the stored schema of a kind.
///
/// Callers only ever pass a superset of the stored schema.
///
/// ## Errors
/// Returns a database error if the statement fails.
pub async fn update_schema(
    conn: &mut DbConnection<'_>,
    name: &str,
    schema: &serde_json::Value,
) -> diesel::QueryResult<usize> {
    diesel::update(event_kind::table.find(name))
        .set((
            event_kind::schema.eq(schema),
            event_kind::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)
        .await
}
