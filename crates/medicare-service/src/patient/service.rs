//! Patient management.

use medicare_core::patient::PatientProfile;
use medicare_db::db::connection::DbConnection;
use medicare_db::db::query::patient;
use medicare_db::model::patient::{NewPatient, Patient, PatientChangeset};

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Creates a patient owned by `owner_id`.
///
/// ## Errors
/// Returns `InvalidInput` for a blank name, or a storage error.
#[tracing::instrument(skip(conn, profile))]
pub async fn create_patient(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    profile: PatientProfile,
) -> ServiceResult<Patient> {
    let profile = profile.normalized()?;
    let new_patient = NewPatient::from_profile(uuid::Uuid::now_v7(), owner_id, profile);
    let created = patient::insert(conn, &new_patient).await?;
    tracing::info!(patient_id = %created.id, "Patient created");
    Ok(created)
}

/// ## Errors
/// Returns `NotFound` if the patient does not exist, or a storage error.
#[tracing::instrument(skip(conn))]
pub async fn get_patient(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> ServiceResult<Patient> {
    patient::get(conn, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("patient {id}")))
}

/// ## Errors
/// Returns a storage error if the query fails.
#[tracing::instrument(skip(conn))]
pub async fn list_patients(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
) -> ServiceResult<Vec<Patient>> {
    Ok(patient::list_by_owner(conn, owner_id).await?)
}

/// ## Summary
/// Replaces a patient's demographics and clinical summary.
///
/// ## Errors
/// Returns `InvalidInput` for a blank name, `NotFound` if the patient does
/// not exist, or a storage error.
#[tracing::instrument(skip(conn, profile))]
pub async fn update_patient(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    profile: PatientProfile,
) -> ServiceResult<Patient> {
    let changes = PatientChangeset::from(profile.normalized()?);
    patient::update(conn, id, &changes)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("patient {id}")))
}

/// ## Summary
/// Deletes a patient together with all of its events.
///
/// ## Errors
/// Returns `NotFound` if the patient does not exist, or a storage error.
#[tracing::instrument(skip(conn))]
pub async fn delete_patient(conn: &mut DbConnection<'_>, id: uuid::Uuid) -> ServiceResult<()> {
    if patient::delete(conn, id).await? == 0 {
        return Err(ServiceError::NotFound(format!("patient {id}")));
    }
    tracing::info!("Patient and events deleted");
    Ok(())
}
