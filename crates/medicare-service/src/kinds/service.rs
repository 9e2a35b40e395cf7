//! ## Summary
//! Persistence of the kind registry.
//!
//! The `event_kind` table is the registry of record. Every operation reads it
//! afresh, so kinds registered by another instance are visible immediately
//! and no registry state is held in memory between requests.

use diesel_async::scoped_futures::ScopedFutureExt;
use medicare_core::registry::{
    KindRegistry, KindSchema, Registration, RegistryError, ValidatedFields, builtin,
};
use medicare_db::db::connection::DbConnection;
use medicare_db::db::query::event_kind;
use medicare_db::db::transaction::with_transaction;
use medicare_db::model::event_kind::{NewEventKind, encode_schema};
use serde_json::{Map, Value};

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Loads every registered kind.
///
/// ## Errors
/// Returns an error if the query fails or a stored schema does not decode.
#[tracing::instrument(skip(conn))]
pub async fn load_registry(conn: &mut DbConnection<'_>) -> ServiceResult<KindRegistry> {
    let rows = event_kind::all(conn).await?;

    let mut registry = KindRegistry::new();
    for row in rows {
        let schema = row.decode_schema()?;
        registry.register_kind(&row.name, schema)?;
    }

    tracing::trace!(kinds = registry.len(), "Loaded kind registry");
    Ok(registry)
}

/// ## Summary
/// Registers a kind, or confirms an identical registration.
///
/// The row is locked while comparing, and a concurrent first registration
/// of the same name is detected by re-reading after the insert.
///
/// ## Errors
/// - `SchemaConflict` if the kind exists with a different schema
/// - declaration errors for malformed schemas
/// - storage errors
#[tracing::instrument(skip(conn, schema), fields(fields = schema.fields.len()))]
pub async fn register_kind(
    conn: &mut DbConnection<'_>,
    name: &str,
    schema: KindSchema,
) -> ServiceResult<Registration> {
    // Checks the name and every declaration before touching storage.
    KindRegistry::new().register_kind(name, schema.clone())?;

    let name = name.to_owned();
    let new_kind = NewEventKind::new(&name, &schema)?;

    let outcome = with_transaction(conn, move |tx| {
        async move {
            if let Some(existing) = event_kind::get_for_update(tx, &name).await? {
                return compare(&name, &existing.decode_schema()?, &schema);
            }

            if event_kind::insert_if_absent(tx, &new_kind).await? == 1 {
                return Ok(Registration::Added);
            }

            let Some(existing) = event_kind::get_for_update(tx, &name).await? else {
                return Err(ServiceError::InvariantViolation(
                    "kind insert skipped but no row found",
                ));
            };
            compare(&name, &existing.decode_schema()?, &schema)
        }
        .scope_boxed()
    })
    .await?;

    if outcome == Registration::Added {
        tracing::info!("Registered event kind");
    }
    Ok(outcome)
}

fn compare(name: &str, stored: &KindSchema, requested: &KindSchema) -> ServiceResult<Registration> {
    if stored == requested {
        Ok(Registration::Unchanged)
    } else {
        Err(RegistryError::SchemaConflict(name.to_owned()).into())
    }
}

/// ## Summary
/// Adds optional fields to a registered kind.
///
/// ## Returns
/// The outcome and the kind's schema after the call.
///
/// ## Errors
/// - `UnknownKind` if the kind is not registered
/// - `FieldConflict` if a field is already declared with another rule
/// - storage errors
#[tracing::instrument(skip(conn, additional), fields(fields = additional.fields.len()))]
pub async fn extend_kind(
    conn: &mut DbConnection<'_>,
    name: &str,
    additional: KindSchema,
) -> ServiceResult<(Registration, KindSchema)> {
    let name = name.to_owned();

    let (outcome, schema) = with_transaction(conn, move |tx| {
        async move {
            let Some(existing) = event_kind::get_for_update(tx, &name).await? else {
                return Err(RegistryError::UnknownKind(name.clone()).into());
            };

            let mut registry = KindRegistry::new();
            registry.register_kind(&name, existing.decode_schema()?)?;
            let outcome = registry.extend_kind(&name, additional)?;

            let schema = registry
                .schema(&name)
                .cloned()
                .ok_or(ServiceError::InvariantViolation("extended kind vanished"))?;

            if outcome == Registration::Added {
                event_kind::update_schema(tx, &name, &encode_schema(&schema)?).await?;
            }
            Ok::<_, ServiceError>((outcome, schema))
        }
        .scope_boxed()
    })
    .await?;

    if outcome == Registration::Added {
        tracing::info!("Extended event kind");
    }
    Ok((outcome, schema))
}

/// ## Summary
/// Ensures the compiled-in kinds are registered.
///
/// A missing kind is registered. An existing one is extended with any
/// compiled-in field it lacks, so fields added at runtime survive a restart.
///
/// ## Errors
/// Returns an error if a stored builtin contradicts its compiled-in rules.
#[tracing::instrument(skip(conn))]
pub async fn seed_builtin_kinds(conn: &mut DbConnection<'_>) -> ServiceResult<()> {
    let registry = load_registry(conn).await?;

    for (kind, schema) in builtin::all() {
        let name = kind.as_str();
        if registry.contains(name) {
            extend_kind(conn, name, schema).await?;
        } else {
            register_kind(conn, name, schema).await?;
        }
    }

    tracing::debug!("Builtin event kinds seeded");
    Ok(())
}

/// ## Summary
/// Validates a field bag against the current registry without storing it.
///
/// ## Errors
/// Returns the validation failure, or a storage error loading the registry.
#[tracing::instrument(skip(conn, fields))]
pub async fn validate_fields(
    conn: &mut DbConnection<'_>,
    kind: &str,
    fields: &Map<String, Value>,
) -> ServiceResult<ValidatedFields> {
    let registry = load_registry(conn).await?;
    Ok(registry.validate(kind, fields)?)
}
