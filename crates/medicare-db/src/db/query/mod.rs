pub mod care_event;
pub mod event_kind;
pub mod patient;
