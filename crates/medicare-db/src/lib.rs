//! PostgreSQL storage for patients, registered event kinds and care events.

pub mod db;
pub mod error;
pub mod model;
