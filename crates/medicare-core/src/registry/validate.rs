//! Per-field validation and normalization.

use serde_json::Value;

use super::error::{Bound, ValidationError};
use super::schema::{FieldRule, FieldValue, ValueType};

/// ## Summary
/// Checks one submitted value against its rule.
///
/// Returns `Ok(None)` when the value counts as absent (JSON `null`, or blank
/// text), otherwise the normalized value.
///
/// ## Errors
/// Returns the first constraint the value violates.
pub fn check_field(
    field: &str,
    rule: &FieldRule,
    value: &Value,
) -> Result<Option<FieldValue>, ValidationError> {
    if value.is_null() {
        return Ok(None);
    }

    match rule {
        FieldRule::Integer { min, max } => {
            let Some(v) = coerce_integer(value) else {
                return Err(type_error(field, ValueType::Integer));
            };
            if let Some(min) = min.filter(|min| v < *min) {
                return Err(range_error(
                    field,
                    Bound::Min(FieldValue::Integer(min)),
                    FieldValue::Integer(v),
                ));
            }
            if let Some(max) = max.filter(|max| v > *max) {
                return Err(range_error(
                    field,
                    Bound::Max(FieldValue::Integer(max)),
                    FieldValue::Integer(v),
                ));
            }
            Ok(Some(FieldValue::Integer(v)))
        }
        FieldRule::Decimal { min, max, scale } => {
            let Some(raw) = coerce_decimal(value) else {
                return Err(type_error(field, ValueType::Decimal));
            };
            let v = round_to_scale(raw, *scale);
            if let Some(min) = min.filter(|min| v < *min) {
                return Err(range_error(
                    field,
                    Bound::Min(FieldValue::Decimal(min)),
                    FieldValue::Decimal(v),
                ));
            }
            if let Some(max) = max.filter(|max| v > *max) {
                return Err(range_error(
                    field,
                    Bound::Max(FieldValue::Decimal(max)),
                    FieldValue::Decimal(v),
                ));
            }
            Ok(Some(FieldValue::Decimal(v)))
        }
        FieldRule::Text { max_len, allowed } => {
            let Value::String(raw) = value else {
                return Err(type_error(field, ValueType::Text));
            };
            let text = raw.trim();
            if text.is_empty() {
                return Ok(None);
            }
            if let Some(max_len) = max_len.filter(|max_len| text.chars().count() > *max_len) {
                return Err(ValidationError::FieldTooLong {
                    field: field.to_owned(),
                    max_len,
                });
            }
            if let Some(allowed) = allowed
                && !allowed.iter().any(|a| a == text)
            {
                return Err(ValidationError::FieldNotInSet {
                    field: field.to_owned(),
                    allowed: allowed.clone(),
                });
            }
            Ok(Some(FieldValue::Text(text.to_owned())))
        }
    }
}

/// Integers arrive either as JSON integers or as numeric strings from form inputs.
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_decimal(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

/// Rounds half away from zero to `scale` fractional digits.
///
/// Values too large to scale are returned unchanged; at that magnitude an
/// `f64` carries no fractional digits anyway.
#[must_use]
pub fn round_to_scale(value: f64, scale: u8) -> f64 {
    let factor = 10_f64.powi(i32::from(scale));
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value
    }
}

fn type_error(field: &str, expected: ValueType) -> ValidationError {
    ValidationError::FieldType {
        field: field.to_owned(),
        expected,
    }
}

fn range_error(field: &str, bound: Bound, value: FieldValue) -> ValidationError {
    ValidationError::FieldRange {
        field: field.to_owned(),
        bound,
        value,
    }
}
