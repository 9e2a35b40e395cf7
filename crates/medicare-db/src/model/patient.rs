use chrono::{DateTime, NaiveDate, Utc};
use diesel::{pg::Pg, prelude::*};
use medicare_core::patient::PatientProfile;

use crate::db::enums::Gender;
use crate::db::schema::patient;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, serde::Serialize)]
#[diesel(table_name = patient)]
#[diesel(check_for_backend(Pg))]
pub struct Patient {
    pub id: uuid::Uuid,
    pub owner_id: uuid::Uuid,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub medical_conditions: Option<String>,
    pub medications: Option<String>,
    pub allergies: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = patient)]
pub struct NewPatient {
    pub id: uuid::Uuid,
    pub owner_id: uuid::Uuid,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub medical_conditions: Option<String>,
    pub medications: Option<String>,
    pub allergies: Option<String>,
    pub notes: Option<String>,
}

impl NewPatient {
    #[must_use]
    pub fn from_profile(id: uuid::Uuid, owner_id: uuid::Uuid, profile: PatientProfile) -> Self {
        Self {
            id,
            owner_id,
            full_name: profile.full_name,
            birth_date: profile.birth_date,
            gender: profile.gender.map(Gender::from),
            phone: profile.phone,
            email: profile.email,
            address: profile.address,
            emergency_contact: profile.emergency_contact,
            medical_conditions: profile.medical_conditions,
            medications: profile.medications,
            allergies: profile.allergies,
            notes: profile.notes,
        }
    }
}

/// Full replacement of the editable profile; `None` clears a column.
#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = patient)]
#[diesel(treat_none_as_null = true)]
pub struct PatientChangeset {
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub medical_conditions: Option<String>,
    pub medications: Option<String>,
    pub allergies: Option<String>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<PatientProfile> for PatientChangeset {
    fn from(profile: PatientProfile) -> Self {
        Self {
            full_name: profile.full_name,
            birth_date: profile.birth_date,
            gender: profile.gender.map(Gender::from),
            phone: profile.phone,
            email: profile.email,
            address: profile.address,
            emergency_contact: profile.emergency_contact,
            medical_conditions: profile.medical_conditions,
            medications: profile.medications,
            allergies: profile.allergies,
            notes: profile.notes,
            updated_at: Utc::now(),
        }
    }
}
