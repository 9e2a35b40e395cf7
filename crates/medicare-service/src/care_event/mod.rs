pub mod listing;
pub mod service;

pub use listing::{EventListing, EventQuery};
pub use service::{RemoveOutcome, append_event, get_event, list_by_patient, remove_event};
