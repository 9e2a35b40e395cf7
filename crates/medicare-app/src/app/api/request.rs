//! Request parsing shared by the API handlers.

use salvo::Request;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Reads a UUID path parameter.
///
/// ## Errors
/// Returns `BadRequest` if the parameter is missing or not a UUID.
pub fn path_uuid(req: &Request, name: &str) -> AppResult<uuid::Uuid> {
    let raw = req
        .param::<String>(name)
        .ok_or_else(|| AppError::BadRequest(format!("missing path parameter '{name}'")))?;
    uuid::Uuid::parse_str(&raw)
        .map_err(|_| AppError::BadRequest(format!("'{raw}' is not a valid {name}")))
}

/// ## Summary
/// Reads an optional query parameter, parsing it with `parse`.
///
/// ## Errors
/// Returns `BadRequest` if the parameter is present but does not parse.
pub fn query_param<T>(
    req: &Request,
    name: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> AppResult<Option<T>> {
    match req.query::<String>(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse(raw.trim())
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("invalid value '{raw}' for '{name}'"))),
    }
}

/// ## Summary
/// Deserializes the JSON request body.
///
/// ## Errors
/// Returns `BadRequest` if the body is not valid JSON for `T`.
pub async fn json_body<T: DeserializeOwned + Send>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>().await.map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        AppError::BadRequest(format!("invalid request body: {e}"))
    })
}
