//! Care event kind discriminant.
//!
//! The set of kinds grows over the product's lifetime, so kinds registered
//! after this crate was compiled are carried by [`EventKind::Other`] rather
//! than rejected at parse time. Whether a kind is acceptable is decided by the
//! [`KindRegistry`](crate::registry::KindRegistry), never by this type.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Drink,
    Meal,
    Bathroom,
    Mood,
    Medication,
    Drain,
    VitalSigns,
    /// A kind registered at runtime.
    Other(String),
}

impl EventKind {
    /// Kinds compiled into this crate.
    pub const KNOWN: [Self; 7] = [
        Self::Drink,
        Self::Meal,
        Self::Bathroom,
        Self::Mood,
        Self::Medication,
        Self::Drain,
        Self::VitalSigns,
    ];

    /// ## Summary
    /// Maps a stored kind name to its variant. Unrecognized names become `Other`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "drink" => Self::Drink,
            "meal" => Self::Meal,
            "bathroom" => Self::Bathroom,
            "mood" => Self::Mood,
            "medication" => Self::Medication,
            "drain" => Self::Drain,
            "vital_signs" => Self::VitalSigns,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the database string representation of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Drink => "drink",
            Self::Meal => "meal",
            Self::Bathroom => "bathroom",
            Self::Mood => "mood",
            Self::Medication => "medication",
            Self::Drain => "drain",
            Self::VitalSigns => "vital_signs",
            Self::Other(name) => name,
        }
    }

    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}
