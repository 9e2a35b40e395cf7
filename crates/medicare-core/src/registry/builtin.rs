//! Schemas of the kinds the product shipped with.
//!
//! Vital-sign bounds are product decisions, chosen wide enough to admit
//! critically ill patients while rejecting obvious entry mistakes.

use super::schema::KindSchema;
use crate::kind::EventKind;

const SHORT_TEXT: usize = 500;
const LONG_TEXT: usize = 1000;

const MAX_VOLUME_ML: i64 = 5000;

pub const MEAL_TYPES: &[&str] = &["breakfast", "lunch", "dinner", "snack"];
pub const MEDICATION_ROUTES: &[&str] = &[
    "oral",
    "iv",
    "im",
    "subcutaneous",
    "topical",
    "inhaled",
    "rectal",
    "other",
];
pub const BATHROOM_TYPES: &[&str] = &["urine", "stool", "both"];

#[must_use]
pub fn drink() -> KindSchema {
    KindSchema::new()
        .integer("volume_ml", 0, MAX_VOLUME_ML)
        .text("liquid_type", SHORT_TEXT)
}

#[must_use]
pub fn bathroom() -> KindSchema {
    KindSchema::new()
        .integer("volume_ml", 0, MAX_VOLUME_ML)
        .one_of("bathroom_type", BATHROOM_TYPES)
}

#[must_use]
pub fn meal() -> KindSchema {
    KindSchema::new()
        .text("meal_description", LONG_TEXT)
        .one_of("meal_type", MEAL_TYPES)
        .integer("consumption_percentage", 0, 100)
}

#[must_use]
pub fn medication() -> KindSchema {
    KindSchema::new()
        .text("medication_name", SHORT_TEXT)
        .text("dose", SHORT_TEXT)
        .one_of("route", MEDICATION_ROUTES)
}

#[must_use]
pub fn drain() -> KindSchema {
    KindSchema::new()
        .text("drain_type", SHORT_TEXT)
        .integer("left_amount", 0, MAX_VOLUME_ML)
        .integer("right_amount", 0, MAX_VOLUME_ML)
        .text("left_aspect", SHORT_TEXT)
        .text("right_aspect", SHORT_TEXT)
}

#[must_use]
pub fn vital_signs() -> KindSchema {
    KindSchema::new()
        .integer("systolic_bp", 50, 260)
        .integer("diastolic_bp", 20, 160)
        .integer("heart_rate", 20, 250)
        .integer("respiratory_rate", 4, 60)
        .integer("oxygen_saturation", 50, 100)
        .decimal("temperature", 30.0, 45.0, 1)
}

#[must_use]
pub fn mood() -> KindSchema {
    KindSchema::new()
        .integer("mood_scale", 1, 10)
        .integer("happiness_scale", 1, 10)
        .text("mood_notes", LONG_TEXT)
}

/// Schema of a compiled-in kind; `None` for runtime kinds.
#[must_use]
pub fn schema_for(kind: &EventKind) -> Option<KindSchema> {
    match kind {
        EventKind::Drink => Some(drink()),
        EventKind::Meal => Some(meal()),
        EventKind::Bathroom => Some(bathroom()),
        EventKind::Mood => Some(mood()),
        EventKind::Medication => Some(medication()),
        EventKind::Drain => Some(drain()),
        EventKind::VitalSigns => Some(vital_signs()),
        EventKind::Other(_) => None,
    }
}

/// All compiled-in kinds paired with their schemas.
#[must_use]
pub fn all() -> Vec<(EventKind, KindSchema)> {
    EventKind::KNOWN
        .into_iter()
        .filter_map(|kind| schema_for(&kind).map(|schema| (kind, schema)))
        .collect()
}
