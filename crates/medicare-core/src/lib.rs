//! Care event domain core: kind registry, field validation and the tagged
//! event payload, with no storage dependencies.

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod kind;
pub mod patient;
pub mod registry;
pub mod types;
pub mod util;
