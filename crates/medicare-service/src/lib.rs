//! Care event store, kind registry persistence and patient management.

pub mod care_event;
pub mod error;
pub mod kinds;
pub mod patient;
