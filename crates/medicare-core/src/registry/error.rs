use thiserror::Error;

use super::schema::{FieldValue, ValueType};

/// The limit a value fell outside of.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "side", content = "value", rename_all = "snake_case")]
pub enum Bound {
    Min(FieldValue),
    Max(FieldValue),
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Min(v) => write!(f, "minimum {v}"),
            Self::Max(v) => write!(f, "maximum {v}"),
        }
    }
}

/// Rejection of a submitted field bag. Never worth retrying: the input must change.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unknown event kind: {0}")]
    UnknownKind(String),

    #[error("Field '{field}' is not allowed for kind '{kind}'")]
    FieldNotAllowed { kind: String, field: String },

    #[error("Field '{field}' must be {expected}")]
    FieldType { field: String, expected: ValueType },

    #[error("Field '{field}' value {value} is outside the {bound}")]
    FieldRange {
        field: String,
        bound: Bound,
        value: FieldValue,
    },

    #[error("Field '{field}' exceeds {max_len} characters")]
    FieldTooLong { field: String, max_len: usize },

    #[error("Field '{field}' must be one of: {}", allowed.join(", "))]
    FieldNotInSet { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Name of the offending field, if the rejection concerns one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownKind(_) => None,
            Self::FieldNotAllowed { field, .. }
            | Self::FieldType { field, .. }
            | Self::FieldRange { field, .. }
            | Self::FieldTooLong { field, .. }
            | Self::FieldNotInSet { field, .. } => Some(field),
        }
    }

    /// Stable machine-readable code for API clients.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownKind(_) => "unknown_kind",
            Self::FieldNotAllowed { .. } => "field_not_allowed",
            Self::FieldType { .. } => "field_type",
            Self::FieldRange { .. } => "field_range",
            Self::FieldTooLong { .. } => "field_too_long",
            Self::FieldNotInSet { .. } => "field_not_in_set",
        }
    }
}

/// Errors raised while changing the set of registered kinds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Invalid kind name '{0}': expected lowercase snake_case of at most 64 characters")]
    InvalidKindName(String),

    #[error("Kind '{0}' is already registered with a different schema")]
    SchemaConflict(String),

    #[error("Kind '{kind}' already declares field '{field}' with a different rule")]
    FieldConflict { kind: String, field: String },

    #[error("Unknown event kind: {0}")]
    UnknownKind(String),

    #[error("Field '{0}' is a common event column and cannot be declared by a kind")]
    ReservedField(String),

    #[error("Invalid field name '{0}': expected lowercase snake_case of at most 64 characters")]
    InvalidFieldName(String),

    #[error("Field '{field}' maps to a {column} column but was declared as {declared}")]
    ColumnTypeMismatch {
        field: String,
        column: ValueType,
        declared: ValueType,
    },

    #[error("Field '{field}' has an invalid rule: {reason}")]
    InvalidRule { field: String, reason: &'static str },
}

impl RegistryError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidKindName(_) => "invalid_kind_name",
            Self::SchemaConflict(_) => "schema_conflict",
            Self::FieldConflict { .. } => "field_conflict",
            Self::UnknownKind(_) => "unknown_kind",
            Self::ReservedField(_) => "reserved_field",
            Self::InvalidFieldName(_) => "invalid_field_name",
            Self::ColumnTypeMismatch { .. } => "column_type_mismatch",
            Self::InvalidRule { .. } => "invalid_rule",
        }
    }

    /// True when the request collides with what is already registered.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::SchemaConflict(_) | Self::FieldConflict { .. })
    }
}
