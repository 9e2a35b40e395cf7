//! Transaction helper utilities for database operations.
//!
//! ## Usage
//!
//! Wrap the statements that must commit together in a scoped closure:
//!
//! ```rust,ignore
//! use diesel_async::scoped_futures::ScopedFutureExt;
//! use medicare_db::db::transaction::with_transaction;
//!
//! with_transaction(&mut conn, |tx| async move {
//!     let existing = event_kind::get_for_update(tx, "sleep").await?;
//!     event_kind::insert_if_absent(tx, &new_kind).await?;
//!     Ok::<_, DbError>(existing)
//! }.scope_boxed()).await?;
//! ```

use diesel_async::{AsyncConnection, scoped_futures::ScopedBoxFuture};

use crate::db::connection::DbConnection;

/// ## Summary
/// Runs a database transaction and returns the closure result.
///
/// The transaction is rolled back if the closure returns an error.
///
/// ## Errors
/// Returns any error produced by the closure, or errors raised while starting
/// or committing the transaction.
pub async fn with_transaction<'a, 'conn, 'pool, T, E, F>(
    conn: &'conn mut DbConnection<'pool>,
    callback: F,
) -> Result<T, E>
where
    F: for<'r> FnOnce(&'r mut DbConnection<'pool>) -> ScopedBoxFuture<'a, 'r, Result<T, E>>
        + Send
        + 'a,
    E: From<diesel::result::Error> + Send + 'a,
    T: Send + 'a,
    'a: 'conn,
{
    conn.transaction::<_, E, _>(callback).await
}
