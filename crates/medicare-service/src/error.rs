use medicare_core::error::{CoreError, RegistryError, ValidationError};
use medicare_db::error::{DbError, StorageErrorKind};
use thiserror::Error;

/// Service layer errors.
///
/// Validation and registry errors mean the input must change; storage errors
/// may be retried when [`ServiceError::is_retryable`] says so.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

impl From<diesel::result::Error> for ServiceError {
    fn from(err: diesel::result::Error) -> Self {
        Self::DatabaseError(DbError::from(err))
    }
}

impl ServiceError {
    /// Storage classification, `None` for errors raised before touching storage.
    #[must_use]
    pub fn storage_kind(&self) -> Option<StorageErrorKind> {
        match self {
            Self::DatabaseError(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// True only for storage failures a caller may retry with backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.storage_kind().is_some_and(StorageErrorKind::is_retryable)
    }

    /// True when the input itself was rejected.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::CoreError(CoreError::Validation(_) | CoreError::InvalidInput(_))
        )
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
