use diesel::{pg::Pg, prelude::*};
use medicare_core::registry::KindSchema;

use crate::db::schema::event_kind;
use crate::error::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = event_kind)]
#[diesel(check_for_backend(Pg))]
#[diesel(primary_key(name))]
pub struct EventKindRow {
    pub name: String,
    pub schema: serde_json::Value,
    pub registered_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl EventKindRow {
    /// ## Errors
    /// Returns `MalformedSchema` if the stored schema does not decode.
    pub fn decode_schema(&self) -> DbResult<KindSchema> {
        serde_json::from_value(self.schema.clone()).map_err(|e| DbError::MalformedSchema {
            kind: self.name.clone(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = event_kind)]
pub struct NewEventKind {
    pub name: String,
    pub schema: serde_json::Value,
}

impl NewEventKind {
    /// ## Errors
    /// Returns an error if the schema cannot be serialized.
    pub fn new(name: &str, schema: &KindSchema) -> DbResult<Self> {
        Ok(Self {
            name: name.to_owned(),
            schema: encode_schema(schema)?,
        })
    }
}

/// ## Errors
/// Returns an error if the schema cannot be serialized.
pub fn encode_schema(schema: &KindSchema) -> DbResult<serde_json::Value> {
    serde_json::to_value(schema)
        .map_err(|e| medicare_core::error::CoreError::InvalidInput(e.to_string()).into())
}
