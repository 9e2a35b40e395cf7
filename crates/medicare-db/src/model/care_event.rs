//! Wide `care_event` row and its conversion to and from the tagged payload.

use chrono::{DateTime, Utc};
use diesel::{pg::Pg, prelude::*};
use medicare_core::error::CoreError;
use medicare_core::event::{CareEvent, EventDetails};
use medicare_core::kind::EventKind;
use medicare_core::registry::{FieldValue, ValidatedFields, column_type};
use serde_json::{Map, Value};

use crate::db::schema::care_event;
use crate::error::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = care_event)]
#[diesel(check_for_backend(Pg))]
pub struct CareEventRow {
    pub id: uuid::Uuid,
    pub patient_id: uuid::Uuid,
    pub kind: String,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_by: Option<uuid::Uuid>,
    pub volume_ml: Option<i32>,
    pub liquid_type: Option<String>,
    pub bathroom_type: Option<String>,
    pub meal_description: Option<String>,
    pub meal_type: Option<String>,
    pub consumption_percentage: Option<i32>,
    pub medication_name: Option<String>,
    pub dose: Option<String>,
    pub route: Option<String>,
    pub extra_fields: Value,
    pub drain_type: Option<String>,
    pub left_amount: Option<i32>,
    pub right_amount: Option<i32>,
    pub left_aspect: Option<String>,
    pub right_aspect: Option<String>,
    pub systolic_bp: Option<i32>,
    pub diastolic_bp: Option<i32>,
    pub heart_rate: Option<i32>,
    pub respiratory_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub temperature: Option<f64>,
    pub mood_scale: Option<i32>,
    pub happiness_scale: Option<i32>,
    pub mood_notes: Option<String>,
}

/// Insertable row. `created_at` is left to the database default.
#[derive(Debug, Clone, Default, PartialEq, Insertable)]
#[diesel(table_name = care_event)]
pub struct NewCareEventRow {
    pub id: uuid::Uuid,
    pub patient_id: uuid::Uuid,
    pub kind: String,
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_by: Option<uuid::Uuid>,
    pub volume_ml: Option<i32>,
    pub liquid_type: Option<String>,
    pub bathroom_type: Option<String>,
    pub meal_description: Option<String>,
    pub meal_type: Option<String>,
    pub consumption_percentage: Option<i32>,
    pub medication_name: Option<String>,
    pub dose: Option<String>,
    pub route: Option<String>,
    pub extra_fields: Value,
    pub drain_type: Option<String>,
    pub left_amount: Option<i32>,
    pub right_amount: Option<i32>,
    pub left_aspect: Option<String>,
    pub right_aspect: Option<String>,
    pub systolic_bp: Option<i32>,
    pub diastolic_bp: Option<i32>,
    pub heart_rate: Option<i32>,
    pub respiratory_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub temperature: Option<f64>,
    pub mood_scale: Option<i32>,
    pub happiness_scale: Option<i32>,
    pub mood_notes: Option<String>,
}

impl NewCareEventRow {
    /// ## Summary
    /// Lays validated fields out over the wide row.
    ///
    /// Fields with a typed column go to that column; every other field is
    /// written to `extra_fields`.
    ///
    /// ## Errors
    /// Returns an error if a typed column receives a value of the wrong type
    /// or an integer outside the 32-bit column range. Registry validation
    /// rules these out, so either indicates a registry/column mismatch.
    pub fn build(
        id: uuid::Uuid,
        patient_id: uuid::Uuid,
        kind: &EventKind,
        occurred_at: DateTime<Utc>,
        notes: Option<String>,
        created_by: Option<uuid::Uuid>,
        fields: ValidatedFields,
    ) -> DbResult<Self> {
        let mut row = Self {
            id,
            patient_id,
            kind: kind.as_str().to_owned(),
            occurred_at,
            notes,
            created_by,
            ..Self::default()
        };
        let mut extras = Map::new();

        for (name, value) in fields {
            if column_type(&name).is_some() {
                row.set_column(&name, value)?;
            } else {
                extras.insert(name, serde_json::to_value(value).map_err(invalid)?);
            }
        }

        row.extra_fields = Value::Object(extras);
        Ok(row)
    }

    fn set_column(&mut self, name: &str, value: FieldValue) -> DbResult<()> {
        let slot = match name {
            "volume_ml" => return set_int(&mut self.volume_ml, &value),
            "consumption_percentage" => return set_int(&mut self.consumption_percentage, &value),
            "left_amount" => return set_int(&mut self.left_amount, &value),
            "right_amount" => return set_int(&mut self.right_amount, &value),
            "systolic_bp" => return set_int(&mut self.systolic_bp, &value),
            "diastolic_bp" => return set_int(&mut self.diastolic_bp, &value),
            "heart_rate" => return set_int(&mut self.heart_rate, &value),
            "respiratory_rate" => return set_int(&mut self.respiratory_rate, &value),
            "oxygen_saturation" => return set_int(&mut self.oxygen_saturation, &value),
            "mood_scale" => return set_int(&mut self.mood_scale, &value),
            "happiness_scale" => return set_int(&mut self.happiness_scale, &value),
            "temperature" => {
                self.temperature = Some(
                    value
                        .as_decimal()
                        .ok_or(CoreError::InvariantViolation("decimal column given non-decimal"))?,
                );
                return Ok(());
            }
            "liquid_type" => &mut self.liquid_type,
            "bathroom_type" => &mut self.bathroom_type,
            "meal_description" => &mut self.meal_description,
            "meal_type" => &mut self.meal_type,
            "medication_name" => &mut self.medication_name,
            "dose" => &mut self.dose,
            "route" => &mut self.route,
            "drain_type" => &mut self.drain_type,
            "left_aspect" => &mut self.left_aspect,
            "right_aspect" => &mut self.right_aspect,
            "mood_notes" => &mut self.mood_notes,
            _ => return Err(CoreError::InvariantViolation("unmapped typed column").into()),
        };
        let FieldValue::Text(text) = value else {
            return Err(CoreError::InvariantViolation("text column given non-text").into());
        };
        *slot = Some(text);
        Ok(())
    }
}

fn set_int(slot: &mut Option<i32>, value: &FieldValue) -> DbResult<()> {
    let v = value
        .as_integer()
        .ok_or(CoreError::InvariantViolation("integer column given non-integer"))?;
    let v = i32::try_from(v)
        .map_err(|_| CoreError::InvariantViolation("integer out of column range"))?;
    *slot = Some(v);
    Ok(())
}

fn invalid(err: serde_json::Error) -> DbError {
    CoreError::InvalidInput(err.to_string()).into()
}

impl CareEventRow {
    /// ## Summary
    /// Every populated kind-specific value on the row, typed columns and
    /// `extra_fields` merged.
    ///
    /// ## Errors
    /// Returns `MalformedRow` if `extra_fields` is not an object of field values.
    pub fn fields(&self) -> DbResult<ValidatedFields> {
        let mut fields: ValidatedFields = if self.extra_fields.is_null() {
            ValidatedFields::new()
        } else {
            serde_json::from_value(self.extra_fields.clone()).map_err(|e| DbError::MalformedRow {
                id: self.id,
                reason: format!("extra_fields: {e}"),
            })?
        };

        let ints = [
            ("volume_ml", self.volume_ml),
            ("consumption_percentage", self.consumption_percentage),
            ("left_amount", self.left_amount),
            ("right_amount", self.right_amount),
            ("systolic_bp", self.systolic_bp),
            ("diastolic_bp", self.diastolic_bp),
            ("heart_rate", self.heart_rate),
            ("respiratory_rate", self.respiratory_rate),
            ("oxygen_saturation", self.oxygen_saturation),
            ("mood_scale", self.mood_scale),
            ("happiness_scale", self.happiness_scale),
        ];
        for (name, value) in ints {
            if let Some(v) = value {
                fields.insert(name, FieldValue::Integer(i64::from(v)));
            }
        }

        let texts = [
            ("liquid_type", &self.liquid_type),
            ("bathroom_type", &self.bathroom_type),
            ("meal_description", &self.meal_description),
            ("meal_type", &self.meal_type),
            ("medication_name", &self.medication_name),
            ("dose", &self.dose),
            ("route", &self.route),
            ("drain_type", &self.drain_type),
            ("left_aspect", &self.left_aspect),
            ("right_aspect", &self.right_aspect),
            ("mood_notes", &self.mood_notes),
        ];
        for (name, value) in texts {
            if let Some(v) = value {
                fields.insert(name, FieldValue::Text(v.clone()));
            }
        }

        if let Some(t) = self.temperature {
            fields.insert("temperature", FieldValue::Decimal(t));
        }

        Ok(fields)
    }

    /// ## Summary
    /// Converts the wide row into the tagged event payload.
    ///
    /// ## Errors
    /// Returns `MalformedRow` if `extra_fields` cannot be decoded.
    pub fn into_event(self) -> DbResult<CareEvent> {
        let kind = EventKind::parse(&self.kind);
        let (details, extra_fields) = EventDetails::from_fields(&kind, self.fields()?);
        Ok(CareEvent {
            id: self.id,
            patient_id: self.patient_id,
            occurred_at: self.occurred_at,
            created_at: self.created_at,
            notes: self.notes,
            created_by: self.created_by,
            details,
            extra_fields,
        })
    }
}
