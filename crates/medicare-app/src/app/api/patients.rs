use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Deserialize;

use medicare_core::constants::PATIENTS_ROUTE_COMPONENT;
use medicare_core::patient::PatientProfile;
use medicare_service::patient::service as patient_service;

use super::events;
use super::request::{json_body, path_uuid, query_param};
use crate::db_handler::get_db_from_depot;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct CreatePatientRequest {
    owner_id: uuid::Uuid,
    #[serde(flatten)]
    profile: PatientProfile,
}

/// ## Summary
/// POST /patients - creates a patient.
///
/// ## Errors
/// Returns HTTP 422 if the name is blank.
#[handler]
async fn create_patient(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = create_patient_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn create_patient_inner(
    req: &mut Request,
    depot: &Depot,
    res: &mut Response,
) -> AppResult<()> {
    let body: CreatePatientRequest = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let patient = patient_service::create_patient(&mut conn, body.owner_id, body.profile).await?;

    res.status_code(StatusCode::CREATED);
    res.render(Json(patient));
    Ok(())
}

/// ## Summary
/// GET /patients?owner_id= - lists the patients of one owner.
#[handler]
async fn list_patients(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = list_patients_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn list_patients_inner(req: &Request, depot: &Depot, res: &mut Response) -> AppResult<()> {
    let owner_id = query_param(req, "owner_id", |raw| uuid::Uuid::parse_str(raw).ok())?
        .ok_or_else(|| AppError::BadRequest("owner_id is required".to_owned()))?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let patients = patient_service::list_patients(&mut conn, owner_id).await?;

    res.render(Json(patients));
    Ok(())
}

#[handler]
async fn get_patient(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = get_patient_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn get_patient_inner(req: &Request, depot: &Depot, res: &mut Response) -> AppResult<()> {
    let id = path_uuid(req, "patient_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let patient = patient_service::get_patient(&mut conn, id).await?;

    res.render(Json(patient));
    Ok(())
}

/// ## Summary
/// PUT /patients/{patient_id} - replaces the patient's profile.
///
/// Omitted optional fields are cleared.
#[handler]
async fn update_patient(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = update_patient_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn update_patient_inner(
    req: &mut Request,
    depot: &Depot,
    res: &mut Response,
) -> AppResult<()> {
    let id = path_uuid(req, "patient_id")?;
    let profile: PatientProfile = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let patient = patient_service::update_patient(&mut conn, id, profile).await?;

    res.render(Json(patient));
    Ok(())
}

/// ## Summary
/// DELETE /patients/{patient_id} - deletes the patient and its events.
#[handler]
async fn delete_patient(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = delete_patient_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn delete_patient_inner(req: &Request, depot: &Depot, res: &mut Response) -> AppResult<()> {
    let id = path_uuid(req, "patient_id")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    patient_service::delete_patient(&mut conn, id).await?;

    res.status_code(StatusCode::NO_CONTENT);
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(PATIENTS_ROUTE_COMPONENT)
        .get(list_patients)
        .post(create_patient)
        .push(
            Router::with_path("{patient_id}")
                .get(get_patient)
                .put(update_patient)
                .delete(delete_patient)
                .push(events::patient_routes()),
        )
}
