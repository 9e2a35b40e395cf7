//! Editable patient profile.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Gender;

const MAX_NAME_CHARS: usize = 200;

/// Demographics and clinical summary of a patient, as submitted by a caregiver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub full_name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub medical_conditions: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PatientProfile {
    /// ## Summary
    /// Trims every text field and turns blank optional text into `None`.
    ///
    /// ## Errors
    /// Returns `InvalidInput` if the name is blank or too long.
    pub fn normalized(self) -> CoreResult<Self> {
        let full_name = self.full_name.trim().to_owned();
        if full_name.is_empty() {
            return Err(CoreError::InvalidInput("full_name must not be blank".into()));
        }
        if full_name.chars().count() > MAX_NAME_CHARS {
            return Err(CoreError::InvalidInput(format!(
                "full_name exceeds {MAX_NAME_CHARS} characters"
            )));
        }

        Ok(Self {
            full_name,
            birth_date: self.birth_date,
            gender: self.gender,
            phone: blank_to_none(self.phone),
            email: blank_to_none(self.email),
            address: blank_to_none(self.address),
            emergency_contact: blank_to_none(self.emergency_contact),
            medical_conditions: blank_to_none(self.medical_conditions),
            medications: blank_to_none(self.medications),
            allergies: blank_to_none(self.allergies),
            notes: blank_to_none(self.notes),
        })
    }
}

/// Trims text and maps whitespace-only values to `None`.
#[must_use]
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
