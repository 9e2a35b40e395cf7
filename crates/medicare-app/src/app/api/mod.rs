mod app_specific;
mod events;
mod kinds;
mod patients;
mod request;

use salvo::Router;

pub use medicare_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, EVENTS_ROUTE_COMPONENT, EVENTS_ROUTE_PREFIX,
    KINDS_ROUTE_COMPONENT, KINDS_ROUTE_PREFIX, PATIENTS_ROUTE_COMPONENT, PATIENTS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the API router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(kinds::routes())
        .push(patients::routes())
        .push(events::routes())
}
