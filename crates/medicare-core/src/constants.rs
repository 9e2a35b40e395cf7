/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const KINDS_ROUTE_COMPONENT: &str = "kinds";
pub const KINDS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", KINDS_ROUTE_COMPONENT);

pub const PATIENTS_ROUTE_COMPONENT: &str = "patients";
pub const PATIENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", PATIENTS_ROUTE_COMPONENT);

pub const EVENTS_ROUTE_COMPONENT: &str = "events";
pub const EVENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", EVENTS_ROUTE_COMPONENT);

/// Columns every care event row carries regardless of kind.
pub const COMMON_EVENT_COLUMNS: &[&str] = &[
    "id",
    "patient_id",
    "kind",
    "occurred_at",
    "created_at",
    "notes",
    "created_by",
    "extra_fields",
];
