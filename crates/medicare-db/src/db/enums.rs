//! Database enum types with Diesel serialization.
//!
//! Type-safe wrappers for text columns guarded by CHECK constraints. Each enum
//! implements `ToSql` and `FromSql` for conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;

/// Patient gender.
///
/// Maps to `patient.gender` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl ToSql<Text, Pg> for Gender {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for Gender {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"male" => Ok(Self::Male),
            b"female" => Ok(Self::Female),
            b"other" => Ok(Self::Other),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl Gender {
    /// Returns the database string representation of this gender.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl From<Gender> for medicare_core::types::Gender {
    fn from(db_gender: Gender) -> Self {
        match db_gender {
            Gender::Male => Self::Male,
            Gender::Female => Self::Female,
            Gender::Other => Self::Other,
        }
    }
}

impl From<medicare_core::types::Gender> for Gender {
    fn from(core_gender: medicare_core::types::Gender) -> Self {
        match core_gender {
            medicare_core::types::Gender::Male => Self::Male,
            medicare_core::types::Gender::Female => Self::Female,
            medicare_core::types::Gender::Other => Self::Other,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
