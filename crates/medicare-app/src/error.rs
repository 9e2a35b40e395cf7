use medicare_core::error::{Bound, CoreError, RegistryError, ValidationError};
use medicare_db::error::{DbError, StorageErrorKind};
use medicare_service::error::ServiceError;
use salvo::http::StatusCode;
use salvo::writing::Json;
use serde::Serialize;
use thiserror::Error;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// ## Summary
/// Body of every error response.
///
/// `field`, `kind` and `bound` are present when the rejection concerns one,
/// so a caregiver can be pointed at the exact input to correct.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound: Option<Bound>,
    pub retryable: bool,
}

impl ErrorResponse {
    fn new(error: String, code: &'static str) -> Self {
        Self {
            error,
            code,
            field: None,
            kind: None,
            bound: None,
            retryable: false,
        }
    }
}

impl AppError {
    /// ## Summary
    /// Maps the error to its HTTP status and response body.
    #[must_use]
    pub fn to_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            Self::ServiceError(err) => service_response(err),
            Self::DatabaseError(err) => storage_response(err),
            Self::CoreError(err) => core_response(err),
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(msg.clone(), "bad_request"),
            ),
        }
    }

    /// Writes the error to `res`, logging server-side failures.
    pub fn render(&self, res: &mut salvo::Response) {
        let (status, body) = self.to_response();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }
        res.status_code(status);
        res.render(Json(body));
    }
}

fn service_response(err: &ServiceError) -> (StatusCode, ErrorResponse) {
    match err {
        ServiceError::Validation(e) => validation_response(e),
        ServiceError::Registry(e) => registry_response(e),
        ServiceError::DatabaseError(e) => storage_response(e),
        ServiceError::CoreError(e) => core_response(e),
        ServiceError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(err.to_string(), "not_found"),
        ),
        ServiceError::InvariantViolation(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Internal server error".to_owned(), "internal"),
        ),
    }
}

fn core_response(err: &CoreError) -> (StatusCode, ErrorResponse) {
    match err {
        CoreError::Validation(e) => validation_response(e),
        CoreError::Registry(e) => registry_response(e),
        CoreError::InvalidInput(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse::new(err.to_string(), "invalid_input"),
        ),
        CoreError::InvariantViolation(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Internal server error".to_owned(), "internal"),
        ),
    }
}

fn validation_response(err: &ValidationError) -> (StatusCode, ErrorResponse) {
    let mut body = ErrorResponse::new(err.to_string(), err.code());
    body.field = err.field().map(str::to_owned);
    match err {
        ValidationError::UnknownKind(kind) | ValidationError::FieldNotAllowed { kind, .. } => {
            body.kind = Some(kind.clone());
        }
        ValidationError::FieldRange { bound, .. } => body.bound = Some(bound.clone()),
        _ => {}
    }
    (StatusCode::UNPROCESSABLE_ENTITY, body)
}

fn registry_response(err: &RegistryError) -> (StatusCode, ErrorResponse) {
    let mut body = ErrorResponse::new(err.to_string(), err.code());
    match err {
        RegistryError::SchemaConflict(kind) | RegistryError::UnknownKind(kind) => {
            body.kind = Some(kind.clone());
        }
        RegistryError::FieldConflict { kind, field } => {
            body.kind = Some(kind.clone());
            body.field = Some(field.clone());
        }
        RegistryError::ReservedField(field) | RegistryError::InvalidFieldName(field) => {
            body.field = Some(field.clone());
        }
        RegistryError::ColumnTypeMismatch { field, .. } | RegistryError::InvalidRule { field, .. } => {
            body.field = Some(field.clone());
        }
        RegistryError::InvalidKindName(_) => {}
    }

    let status = if err.is_conflict() {
        StatusCode::CONFLICT
    } else if matches!(err, RegistryError::UnknownKind(_)) {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, body)
}

fn storage_response(err: &DbError) -> (StatusCode, ErrorResponse) {
    let kind = err.kind();
    let (status, message) = match kind {
        StorageErrorKind::Connectivity | StorageErrorKind::Transient => {
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable, please retry")
        }
        StorageErrorKind::PermissionDenied => {
            (StatusCode::FORBIDDEN, "Not permitted to access this record")
        }
        StorageErrorKind::Constraint => (StatusCode::CONFLICT, "Conflicts with stored data"),
        StorageErrorKind::Other => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    };
    let mut body = ErrorResponse::new(message.to_owned(), kind.as_str());
    body.retryable = kind.is_retryable();
    (status, body)
}
