//! ## Summary
//! Care events as tagged variants.
//!
//! Storage keeps every kind's fields side by side in one wide row. Application
//! code works with [`EventDetails`] instead, which carries only the fields of
//! the event's own kind.

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::kind::EventKind;
use crate::registry::{FieldValue, ValidatedFields};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrinkDetails {
    pub volume_ml: Option<i64>,
    pub liquid_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BathroomDetails {
    pub volume_ml: Option<i64>,
    pub bathroom_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MealDetails {
    pub meal_description: Option<String>,
    pub meal_type: Option<String>,
    pub consumption_percentage: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MedicationDetails {
    pub medication_name: Option<String>,
    pub dose: Option<String>,
    pub route: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainDetails {
    pub drain_type: Option<String>,
    pub left_amount: Option<i64>,
    pub right_amount: Option<i64>,
    pub left_aspect: Option<String>,
    pub right_aspect: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VitalSignsDetails {
    pub systolic_bp: Option<i64>,
    pub diastolic_bp: Option<i64>,
    pub heart_rate: Option<i64>,
    pub respiratory_rate: Option<i64>,
    pub oxygen_saturation: Option<i64>,
    /// Degrees Celsius, one fractional digit.
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoodDetails {
    pub mood_scale: Option<i64>,
    pub happiness_scale: Option<i64>,
    pub mood_notes: Option<String>,
}

/// Kind plus the payload belonging to that kind only.
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetails {
    Drink(DrinkDetails),
    Meal(MealDetails),
    Bathroom(BathroomDetails),
    Mood(MoodDetails),
    Medication(MedicationDetails),
    Drain(DrainDetails),
    VitalSigns(VitalSignsDetails),
    /// A kind registered at runtime; its fields stay untyped.
    Other { kind: String, fields: ValidatedFields },
}

impl EventDetails {
    /// ## Summary
    /// Splits validated fields into the typed payload for `kind`.
    ///
    /// Returns the payload and the fields the typed variant has no slot for
    /// (fields added to a compiled-in kind after release).
    #[must_use]
    pub fn from_fields(kind: &EventKind, mut fields: ValidatedFields) -> (Self, ValidatedFields) {
        let details = match kind {
            EventKind::Drink => Self::Drink(DrinkDetails {
                volume_ml: take_integer(&mut fields, "volume_ml"),
                liquid_type: take_text(&mut fields, "liquid_type"),
            }),
            EventKind::Bathroom => Self::Bathroom(BathroomDetails {
                volume_ml: take_integer(&mut fields, "volume_ml"),
                bathroom_type: take_text(&mut fields, "bathroom_type"),
            }),
            EventKind::Meal => Self::Meal(MealDetails {
                meal_description: take_text(&mut fields, "meal_description"),
                meal_type: take_text(&mut fields, "meal_type"),
                consumption_percentage: take_integer(&mut fields, "consumption_percentage"),
            }),
            EventKind::Medication => Self::Medication(MedicationDetails {
                medication_name: take_text(&mut fields, "medication_name"),
                dose: take_text(&mut fields, "dose"),
                route: take_text(&mut fields, "route"),
            }),
            EventKind::Drain => Self::Drain(DrainDetails {
                drain_type: take_text(&mut fields, "drain_type"),
                left_amount: take_integer(&mut fields, "left_amount"),
                right_amount: take_integer(&mut fields, "right_amount"),
                left_aspect: take_text(&mut fields, "left_aspect"),
                right_aspect: take_text(&mut fields, "right_aspect"),
            }),
            EventKind::VitalSigns => Self::VitalSigns(VitalSignsDetails {
                systolic_bp: take_integer(&mut fields, "systolic_bp"),
                diastolic_bp: take_integer(&mut fields, "diastolic_bp"),
                heart_rate: take_integer(&mut fields, "heart_rate"),
                respiratory_rate: take_integer(&mut fields, "respiratory_rate"),
                oxygen_saturation: take_integer(&mut fields, "oxygen_saturation"),
                temperature: take_decimal(&mut fields, "temperature"),
            }),
            EventKind::Mood => Self::Mood(MoodDetails {
                mood_scale: take_integer(&mut fields, "mood_scale"),
                happiness_scale: take_integer(&mut fields, "happiness_scale"),
                mood_notes: take_text(&mut fields, "mood_notes"),
            }),
            EventKind::Other(name) => {
                return (
                    Self::Other {
                        kind: name.clone(),
                        fields,
                    },
                    ValidatedFields::new(),
                );
            }
        };
        (details, fields)
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Drink(_) => EventKind::Drink,
            Self::Meal(_) => EventKind::Meal,
            Self::Bathroom(_) => EventKind::Bathroom,
            Self::Mood(_) => EventKind::Mood,
            Self::Medication(_) => EventKind::Medication,
            Self::Drain(_) => EventKind::Drain,
            Self::VitalSigns(_) => EventKind::VitalSigns,
            Self::Other { kind, .. } => EventKind::Other(kind.clone()),
        }
    }

    /// ## Summary
    /// Flattens the payload back into a field bag holding only populated fields.
    #[must_use]
    pub fn to_fields(&self) -> ValidatedFields {
        let mut out = ValidatedFields::new();
        let mut int = |name: &str, v: Option<i64>| {
            if let Some(v) = v {
                out.insert(name, FieldValue::Integer(v));
            }
        };
        match self {
            Self::Drink(d) => int("volume_ml", d.volume_ml),
            Self::Bathroom(d) => int("volume_ml", d.volume_ml),
            Self::Meal(d) => int("consumption_percentage", d.consumption_percentage),
            Self::Drain(d) => {
                int("left_amount", d.left_amount);
                int("right_amount", d.right_amount);
            }
            Self::VitalSigns(d) => {
                int("systolic_bp", d.systolic_bp);
                int("diastolic_bp", d.diastolic_bp);
                int("heart_rate", d.heart_rate);
                int("respiratory_rate", d.respiratory_rate);
                int("oxygen_saturation", d.oxygen_saturation);
            }
            Self::Mood(d) => {
                int("mood_scale", d.mood_scale);
                int("happiness_scale", d.happiness_scale);
            }
            Self::Medication(_) | Self::Other { .. } => {}
        }

        let mut text = |name: &str, v: &Option<String>| {
            if let Some(v) = v {
                out.insert(name, FieldValue::Text(v.clone()));
            }
        };
        match self {
            Self::Drink(d) => text("liquid_type", &d.liquid_type),
            Self::Bathroom(d) => text("bathroom_type", &d.bathroom_type),
            Self::Meal(d) => {
                text("meal_description", &d.meal_description);
                text("meal_type", &d.meal_type);
            }
            Self::Medication(d) => {
                text("medication_name", &d.medication_name);
                text("dose", &d.dose);
                text("route", &d.route);
            }
            Self::Drain(d) => {
                text("drain_type", &d.drain_type);
                text("left_aspect", &d.left_aspect);
                text("right_aspect", &d.right_aspect);
            }
            Self::Mood(d) => text("mood_notes", &d.mood_notes),
            Self::VitalSigns(_) | Self::Other { .. } => {}
        }

        match self {
            Self::VitalSigns(VitalSignsDetails {
                temperature: Some(t),
                ..
            }) => out.insert("temperature", FieldValue::Decimal(*t)),
            Self::Other { fields, .. } => out.extend(fields.clone()),
            _ => {}
        }
        out
    }
}

fn take_integer(fields: &mut ValidatedFields, name: &str) -> Option<i64> {
    match fields.remove(name) {
        Some(FieldValue::Integer(v)) => Some(v),
        Some(other) => {
            fields.insert(name, other);
            None
        }
        None => None,
    }
}

fn take_decimal(fields: &mut ValidatedFields, name: &str) -> Option<f64> {
    match fields.remove(name) {
        Some(FieldValue::Decimal(v)) => Some(v),
        Some(other) => {
            fields.insert(name, other);
            None
        }
        None => None,
    }
}

fn take_text(fields: &mut ValidatedFields, name: &str) -> Option<String> {
    match fields.remove(name) {
        Some(FieldValue::Text(v)) => Some(v),
        Some(other) => {
            fields.insert(name, other);
            None
        }
        None => None,
    }
}

/// A persisted care event.
#[derive(Debug, Clone, PartialEq)]
pub struct CareEvent {
    pub id: uuid::Uuid,
    pub patient_id: uuid::Uuid,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_by: Option<uuid::Uuid>,
    pub details: EventDetails,
    /// Registered fields without a slot in `details`.
    pub extra_fields: ValidatedFields,
}

impl CareEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.details.kind()
    }

    /// All populated kind-specific fields, typed and extra.
    #[must_use]
    pub fn fields(&self) -> ValidatedFields {
        let mut fields = self.details.to_fields();
        fields.extend(self.extra_fields.clone());
        fields
    }
}

/// Serializes as one flat record keyed by column name, the shape the REST
/// backend returns for a row.
impl Serialize for CareEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(7 + fields.len()))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("patient_id", &self.patient_id)?;
        map.serialize_entry("kind", &self.kind())?;
        map.serialize_entry("occurred_at", &self.occurred_at)?;
        map.serialize_entry("created_at", &self.created_at)?;
        map.serialize_entry("notes", &self.notes)?;
        map.serialize_entry("created_by", &self.created_by)?;
        for (name, value) in fields.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A care event as submitted by a caregiver, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewCareEvent {
    pub patient_id: uuid::Uuid,
    pub kind: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_by: Option<uuid::Uuid>,
    /// Flat kind-specific field bag.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl NewCareEvent {
    /// Notes with surrounding whitespace removed; blank notes become `None`.
    #[must_use]
    pub fn normalized_notes(&self) -> Option<String> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
    }
}
