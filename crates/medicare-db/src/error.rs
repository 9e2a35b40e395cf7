use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Constraint names the store maps back to domain errors.
pub mod constraint {
    pub const CARE_EVENT_KIND_FKEY: &str = "care_event_kind_fkey";
    pub const CARE_EVENT_PATIENT_FKEY: &str = "care_event_patient_id_fkey";
}

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Malformed row {id}: {reason}")]
    MalformedRow { id: uuid::Uuid, reason: String },

    #[error("Stored schema of kind '{kind}' is unreadable: {reason}")]
    MalformedSchema { kind: String, reason: String },

    #[error(transparent)]
    CoreError(#[from] medicare_core::error::CoreError),
}

/// Coarse classification of a storage failure, used to decide whether a
/// caller may retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageErrorKind {
    /// The database could not be reached or dropped the connection.
    Connectivity,
    /// The transaction lost a serialization race.
    Transient,
    PermissionDenied,
    Constraint,
    Other,
}

impl StorageErrorKind {
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Connectivity | Self::Transient)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity",
            Self::Transient => "transient",
            Self::PermissionDenied => "permission_denied",
            Self::Constraint => "constraint",
            Self::Other => "other",
        }
    }
}

impl DbError {
    /// ## Summary
    /// Classifies this error for retry and status-code decisions.
    #[must_use]
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            Self::PoolError(_) => StorageErrorKind::Connectivity,
            Self::DatabaseError(err) => classify(err),
            Self::MigrationError(_)
            | Self::MalformedRow { .. }
            | Self::MalformedSchema { .. }
            | Self::CoreError(_) => StorageErrorKind::Other,
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Name of the violated constraint, when the database reported one.
    #[must_use]
    pub fn violated_constraint(&self) -> Option<&str> {
        match self {
            Self::DatabaseError(DieselError::DatabaseError(_, info)) => info.constraint_name(),
            _ => None,
        }
    }
}

fn classify(err: &DieselError) -> StorageErrorKind {
    match err {
        DieselError::DatabaseError(kind, info) => {
            let message = info.message().to_ascii_lowercase();
            if message.contains("permission denied") || message.contains("row-level security") {
                return StorageErrorKind::PermissionDenied;
            }
            match kind {
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation => StorageErrorKind::Constraint,
                DatabaseErrorKind::SerializationFailure => StorageErrorKind::Transient,
                DatabaseErrorKind::UnableToSendCommand | DatabaseErrorKind::ClosedConnection => {
                    StorageErrorKind::Connectivity
                }
                _ => StorageErrorKind::Other,
            }
        }
        DieselError::BrokenTransactionManager => StorageErrorKind::Connectivity,
        _ => StorageErrorKind::Other,
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;
