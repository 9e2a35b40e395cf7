//! Field schemas declared by event kinds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::RegistryError;

/// Storage type of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Integer,
    Decimal,
    Text,
}

impl ValueType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed kind-specific columns of the wide `care_event` row.
///
/// Fields declared under one of these names are stored in the column; any
/// other declared field lands in the row's `extra_fields` object.
pub const TYPED_COLUMNS: &[(&str, ValueType)] = &[
    ("volume_ml", ValueType::Integer),
    ("liquid_type", ValueType::Text),
    ("bathroom_type", ValueType::Text),
    ("meal_description", ValueType::Text),
    ("meal_type", ValueType::Text),
    ("consumption_percentage", ValueType::Integer),
    ("medication_name", ValueType::Text),
    ("dose", ValueType::Text),
    ("route", ValueType::Text),
    ("drain_type", ValueType::Text),
    ("left_amount", ValueType::Integer),
    ("right_amount", ValueType::Integer),
    ("left_aspect", ValueType::Text),
    ("right_aspect", ValueType::Text),
    ("systolic_bp", ValueType::Integer),
    ("diastolic_bp", ValueType::Integer),
    ("heart_rate", ValueType::Integer),
    ("respiratory_rate", ValueType::Integer),
    ("oxygen_saturation", ValueType::Integer),
    ("temperature", ValueType::Decimal),
    ("mood_scale", ValueType::Integer),
    ("happiness_scale", ValueType::Integer),
    ("mood_notes", ValueType::Text),
];

/// Returns the value type of a typed column, or `None` for extra fields.
#[must_use]
pub fn column_type(field: &str) -> Option<ValueType> {
    TYPED_COLUMNS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, ty)| *ty)
}

/// Inclusive bounds the database enforces on typed integer columns. A rule
/// declared on one of these columns must stay inside them.
const COLUMN_BOUNDS: &[(&str, Option<i64>, Option<i64>)] = &[
    ("volume_ml", Some(0), None),
    ("consumption_percentage", Some(0), Some(100)),
    ("left_amount", Some(0), None),
    ("right_amount", Some(0), None),
    ("systolic_bp", Some(1), None),
    ("diastolic_bp", Some(1), None),
    ("heart_rate", Some(1), None),
    ("respiratory_rate", Some(1), None),
    ("oxygen_saturation", Some(0), Some(100)),
    ("mood_scale", Some(1), Some(10)),
    ("happiness_scale", Some(1), Some(10)),
];

/// Returns the `(min, max)` the database enforces on a typed column, if any.
#[must_use]
pub fn column_bounds(field: &str) -> Option<(Option<i64>, Option<i64>)> {
    COLUMN_BOUNDS
        .iter()
        .find(|(name, _, _)| *name == field)
        .map(|(_, min, max)| (*min, *max))
}

/// Constraint on a single field. Bounds are inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldRule {
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Decimal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        /// Fractional digits kept after rounding.
        scale: u8,
    },
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_len: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        allowed: Option<Vec<String>>,
    },
}

impl FieldRule {
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Integer { .. } => ValueType::Integer,
            Self::Decimal { .. } => ValueType::Decimal,
            Self::Text { .. } => ValueType::Text,
        }
    }

    /// ## Summary
    /// Checks that the rule itself is coherent.
    ///
    /// ## Errors
    /// Returns `InvalidRule` for inverted bounds, an excessive decimal scale,
    /// a zero length limit or an empty set of allowed values.
    pub fn check(&self, field: &str) -> Result<(), RegistryError> {
        let invalid = |reason| RegistryError::InvalidRule {
            field: field.to_owned(),
            reason,
        };
        match self {
            Self::Integer {
                min: Some(min),
                max: Some(max),
            } if min > max => Err(invalid("min is greater than max")),
            Self::Decimal { scale, .. } if *scale > 6 => {
                Err(invalid("scale must be at most 6"))
            }
            Self::Decimal {
                min: Some(min),
                max: Some(max),
                ..
            } if min > max => Err(invalid("min is greater than max")),
            Self::Decimal { min, max, .. }
                if min.is_some_and(|v| !v.is_finite()) || max.is_some_and(|v| !v.is_finite()) =>
            {
                Err(invalid("bounds must be finite"))
            }
            Self::Text {
                max_len: Some(0), ..
            } => Err(invalid("max_len must be positive")),
            Self::Text {
                allowed: Some(allowed),
                ..
            } if allowed.is_empty() => Err(invalid("allowed values must not be empty")),
            _ => Ok(()),
        }
    }
}

/// The fields an event kind may carry, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindSchema {
    pub fields: BTreeMap<String, FieldRule>,
}

impl KindSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: &str, rule: FieldRule) -> Self {
        self.fields.insert(name.to_owned(), rule);
        self
    }

    #[must_use]
    pub fn integer(self, name: &str, min: i64, max: i64) -> Self {
        self.field(
            name,
            FieldRule::Integer {
                min: Some(min),
                max: Some(max),
            },
        )
    }

    #[must_use]
    pub fn decimal(self, name: &str, min: f64, max: f64, scale: u8) -> Self {
        self.field(
            name,
            FieldRule::Decimal {
                min: Some(min),
                max: Some(max),
                scale,
            },
        )
    }

    #[must_use]
    pub fn text(self, name: &str, max_len: usize) -> Self {
        self.field(
            name,
            FieldRule::Text {
                max_len: Some(max_len),
                allowed: None,
            },
        )
    }

    #[must_use]
    pub fn one_of(self, name: &str, allowed: &[&str]) -> Self {
        self.field(
            name,
            FieldRule::Text {
                max_len: None,
                allowed: Some(allowed.iter().map(|s| (*s).to_owned()).collect()),
            },
        )
    }

    #[must_use]
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.fields.get(field)
    }
}

/// A normalized field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl FieldValue {
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Integer(_) => ValueType::Integer,
            Self::Decimal(_) => ValueType::Decimal,
            Self::Text(_) => ValueType::Text,
        }
    }

    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_decimal(&self) -> Option<f64> {
        match self {
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

/// Field bag that passed validation for a specific kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatedFields(BTreeMap<String, FieldValue>);

impl ValidatedFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.0.insert(field.into(), value);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    #[must_use]
    pub fn integer(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_integer)
    }

    #[must_use]
    pub fn decimal(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_decimal)
    }

    #[must_use]
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).and_then(FieldValue::as_text).map(str::to_owned)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.0.remove(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

impl FromIterator<(String, FieldValue)> for ValidatedFields {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValidatedFields {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
