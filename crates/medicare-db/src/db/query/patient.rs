//! Queries over the `patient` table.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::patient;
use crate::model::patient::{NewPatient, Patient, PatientChangeset};

/// ## Errors
/// Returns a database error on constraint violation or connection failure.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    new_patient: &NewPatient,
) -> diesel::QueryResult<Patient> {
    diesel::insert_into(patient::table)
        .values(new_patient)
        .returning(Patient::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn get(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> diesel::QueryResult<Option<Patient>> {
    patient::table
        .find(id)
        .select(Patient::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists the patients created by `owner_id`, by name.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_by_owner(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
) -> diesel::QueryResult<Vec<Patient>> {
    patient::table
        .filter(patient::owner_id.eq(owner_id))
        .select(Patient::as_select())
        .order((patient::full_name.asc(), patient::id.asc()))
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the statement fails.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    changes: &PatientChangeset,
) -> diesel::QueryResult<Option<Patient>> {
    diesel::update(patient::table.find(id))
        .set(changes)
        .returning(Patient::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes a patient. Its events are removed by the `ON DELETE CASCADE` key.
///
/// ## Errors
/// Returns a database error if the statement fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> diesel::QueryResult<usize> {
    diesel::delete(patient::table.find(id)).execute(conn).await
}
