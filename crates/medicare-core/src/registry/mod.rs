//! ## Summary
//! Registry of care event kinds and the fields each kind may carry.
//!
//! The registry is the only authority on which kinds exist. Kinds and fields
//! are only ever added: a registered kind keeps its contract for as long as
//! rows of that kind exist.

pub mod builtin;
pub mod error;
pub mod schema;
pub mod validate;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::constants::COMMON_EVENT_COLUMNS;
use crate::kind::EventKind;
use crate::util::name::is_identifier;

pub use error::{Bound, RegistryError, ValidationError};
pub use schema::{
    FieldRule, FieldValue, KindSchema, ValidatedFields, ValueType, column_bounds, column_type,
};

/// Outcome of a successful registration or extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Registration {
    Added,
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KindRegistry {
    kinds: BTreeMap<String, KindSchema>,
}

impl KindRegistry {
    /// An empty registry. Every kind must be registered before use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// A registry holding the compiled-in kinds.
    #[must_use]
    pub fn builtin() -> Self {
        let kinds = builtin::all()
            .into_iter()
            .map(|(kind, schema)| (kind.as_str().to_owned(), schema))
            .collect();
        Self { kinds }
    }

    /// ## Summary
    /// Adds a kind with its field schema.
    ///
    /// Registering the same name with an equal schema is a no-op.
    ///
    /// ## Errors
    /// - `SchemaConflict` if the name is registered with a different schema
    /// - `InvalidKindName`, `InvalidFieldName`, `ReservedField`,
    ///   `ColumnTypeMismatch` or `InvalidRule` if the schema is malformed
    pub fn register_kind(
        &mut self,
        name: &str,
        schema: KindSchema,
    ) -> Result<Registration, RegistryError> {
        if !is_identifier(name) {
            return Err(RegistryError::InvalidKindName(name.to_owned()));
        }

        if let Some(existing) = self.kinds.get(name) {
            return if *existing == schema {
                Ok(Registration::Unchanged)
            } else {
                Err(RegistryError::SchemaConflict(name.to_owned()))
            };
        }

        for (field, rule) in &schema.fields {
            check_declaration(field, rule)?;
        }

        tracing::debug!(kind = name, fields = schema.fields.len(), "Registering event kind");
        self.kinds.insert(name.to_owned(), schema);
        Ok(Registration::Added)
    }

    /// ## Summary
    /// Adds optional fields to a registered kind.
    ///
    /// Fields already declared with an identical rule are skipped.
    ///
    /// ## Errors
    /// - `UnknownKind` if the kind is not registered
    /// - `FieldConflict` if a field is already declared with a different rule
    /// - the declaration errors of [`register_kind`](Self::register_kind)
    pub fn extend_kind(
        &mut self,
        name: &str,
        additional: KindSchema,
    ) -> Result<Registration, RegistryError> {
        let Some(existing) = self.kinds.get(name) else {
            return Err(RegistryError::UnknownKind(name.to_owned()));
        };

        let mut added = Vec::new();
        for (field, rule) in additional.fields {
            match existing.rule(&field) {
                Some(current) if *current == rule => {}
                Some(_) => {
                    return Err(RegistryError::FieldConflict {
                        kind: name.to_owned(),
                        field,
                    });
                }
                None => {
                    check_declaration(&field, &rule)?;
                    added.push((field, rule));
                }
            }
        }

        if added.is_empty() {
            return Ok(Registration::Unchanged);
        }

        if let Some(schema) = self.kinds.get_mut(name) {
            tracing::debug!(kind = name, added = added.len(), "Extending event kind");
            schema.fields.extend(added);
        }
        Ok(Registration::Added)
    }

    /// ## Summary
    /// Validates a flat field bag submitted for `kind`.
    ///
    /// Fields are checked in name order and the first violation is returned,
    /// so a given bag is always rejected for the same reason.
    ///
    /// ## Errors
    /// - `UnknownKind` if `kind` is not registered
    /// - `FieldNotAllowed` if a field is not declared for `kind`
    /// - the field's own type, range, length or membership violation
    pub fn validate(
        &self,
        kind: &str,
        fields: &Map<String, Value>,
    ) -> Result<ValidatedFields, ValidationError> {
        let Some(schema) = self.kinds.get(kind) else {
            return Err(ValidationError::UnknownKind(kind.to_owned()));
        };

        let mut sorted: Vec<(&String, &Value)> = fields.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let mut validated = ValidatedFields::new();
        for (field, value) in sorted {
            let Some(rule) = schema.rule(field) else {
                return Err(ValidationError::FieldNotAllowed {
                    kind: kind.to_owned(),
                    field: field.clone(),
                });
            };
            if let Some(normalized) = validate::check_field(field, rule, value)? {
                validated.insert(field.clone(), normalized);
            }
        }

        Ok(validated)
    }

    #[must_use]
    pub fn schema(&self, kind: &str) -> Option<&KindSchema> {
        self.kinds.get(kind)
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Registered kinds in name order.
    pub fn kinds(&self) -> impl Iterator<Item = (EventKind, &KindSchema)> {
        self.kinds
            .iter()
            .map(|(name, schema)| (EventKind::parse(name), schema))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Checks a single field declaration against the naming, reserved-column and
/// typed-column constraints.
fn check_declaration(field: &str, rule: &FieldRule) -> Result<(), RegistryError> {
    if COMMON_EVENT_COLUMNS.contains(&field) {
        return Err(RegistryError::ReservedField(field.to_owned()));
    }
    if !is_identifier(field) {
        return Err(RegistryError::InvalidFieldName(field.to_owned()));
    }
    rule.check(field)?;
    if let Some(column) = column_type(field)
        && column != rule.value_type()
    {
        return Err(RegistryError::ColumnTypeMismatch {
            field: field.to_owned(),
            column,
            declared: rule.value_type(),
        });
    }
    // Typed integer columns are 32-bit.
    if column_type(field) == Some(ValueType::Integer)
        && let FieldRule::Integer { min, max } = rule
    {
        let fits = |bound: Option<i64>| bound.is_some_and(|v| i32::try_from(v).is_ok());
        if !fits(*min) || !fits(*max) {
            return Err(RegistryError::InvalidRule {
                field: field.to_owned(),
                reason: "typed integer columns need both bounds within 32-bit range",
            });
        }
        if let Some((floor, ceiling)) = column_bounds(field) {
            let below = floor.is_some_and(|f| min.is_none_or(|m| m < f));
            let above = ceiling.is_some_and(|c| max.is_none_or(|m| m > c));
            if below || above {
                return Err(RegistryError::InvalidRule {
                    field: field.to_owned(),
                    reason: "bounds exceed the column's allowed range",
                });
            }
        }
    }
    Ok(())
}
