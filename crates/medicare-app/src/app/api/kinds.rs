//! ## Summary
//! Kind registry endpoints.
//!
//! - `GET  /kinds` lists registered kinds with their schemas
//! - `POST /kinds` registers a kind
//! - `POST /kinds/{kind}/fields` adds optional fields to a kind
//! - `POST /kinds/{kind}/validate` dry-runs validation of a field bag

use std::collections::BTreeMap;

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use medicare_core::constants::KINDS_ROUTE_COMPONENT;
use medicare_core::registry::{FieldRule, KindSchema, Registration, ValidatedFields};
use medicare_service::kinds::service as kind_service;

use super::request::json_body;
use crate::db_handler::get_db_from_depot;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
struct KindResponse {
    name: String,
    /// Whether the kind is one the product shipped with.
    builtin: bool,
    schema: KindSchema,
}

#[derive(Debug, Deserialize)]
struct RegisterKindRequest {
    name: String,
    schema: KindSchema,
}

#[derive(Debug, Deserialize)]
struct ExtendKindRequest {
    fields: BTreeMap<String, FieldRule>,
}

#[derive(Debug, Serialize)]
struct RegistrationResponse {
    name: String,
    outcome: Registration,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<KindSchema>,
}

#[derive(Debug, Serialize)]
struct ValidationResponse {
    kind: String,
    fields: ValidatedFields,
}

fn kind_param(req: &Request) -> AppResult<String> {
    req.param::<String>("kind")
        .ok_or_else(|| AppError::BadRequest("missing path parameter 'kind'".to_owned()))
}

#[handler]
async fn list_kinds(depot: &mut Depot, res: &mut Response) {
    if let Err(err) = list_kinds_inner(depot, res).await {
        err.render(res);
    }
}

async fn list_kinds_inner(depot: &Depot, res: &mut Response) -> AppResult<()> {
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let registry = kind_service::load_registry(&mut conn).await?;

    let kinds: Vec<KindResponse> = registry
        .kinds()
        .map(|(kind, schema)| KindResponse {
            builtin: kind.is_known(),
            name: kind.as_str().to_owned(),
            schema: schema.clone(),
        })
        .collect();

    res.render(Json(kinds));
    Ok(())
}

/// ## Summary
/// POST /kinds - registers a kind.
///
/// ## Errors
/// Returns HTTP 409 if the name is taken by a different schema and HTTP 422
/// if the schema is malformed.
#[handler]
async fn register_kind(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = register_kind_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn register_kind_inner(req: &mut Request, depot: &Depot, res: &mut Response) -> AppResult<()> {
    let body: RegisterKindRequest = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let outcome = kind_service::register_kind(&mut conn, &body.name, body.schema).await?;

    res.status_code(match outcome {
        Registration::Added => StatusCode::CREATED,
        Registration::Unchanged => StatusCode::OK,
    });
    res.render(Json(RegistrationResponse {
        name: body.name,
        outcome,
        schema: None,
    }));
    Ok(())
}

/// ## Summary
/// POST /kinds/{kind}/fields - adds optional fields to a kind.
///
/// ## Errors
/// Returns HTTP 404 for an unknown kind and HTTP 409 if a field is already
/// declared with a different rule.
#[handler]
async fn extend_kind(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = extend_kind_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn extend_kind_inner(req: &mut Request, depot: &Depot, res: &mut Response) -> AppResult<()> {
    let name = kind_param(req)?;
    let body: ExtendKindRequest = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let (outcome, schema) =
        kind_service::extend_kind(&mut conn, &name, KindSchema { fields: body.fields }).await?;

    res.render(Json(RegistrationResponse {
        name,
        outcome,
        schema: Some(schema),
    }));
    Ok(())
}

/// ## Summary
/// POST /kinds/{kind}/validate - validates a flat field bag without storing it.
///
/// ## Errors
/// Returns HTTP 422 naming the offending field or kind.
#[handler]
async fn validate_fields(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    if let Err(err) = validate_fields_inner(req, depot, res).await {
        err.render(res);
    }
}

async fn validate_fields_inner(
    req: &mut Request,
    depot: &Depot,
    res: &mut Response,
) -> AppResult<()> {
    let kind = kind_param(req)?;
    let fields: Map<String, Value> = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let fields = kind_service::validate_fields(&mut conn, &kind, &fields).await?;

    res.render(Json(ValidationResponse { kind, fields }));
    Ok(())
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(KINDS_ROUTE_COMPONENT)
        .get(list_kinds)
        .post(register_kind)
        .push(Router::with_path("{kind}/fields").post(extend_kind))
        .push(Router::with_path("{kind}/validate").post(validate_fields))
}
