//! Identifier rules for kind and field names.
//!
//! ## Summary
//! Kind and field names end up as enum values and JSON keys in the store, so
//! they are restricted to lowercase snake_case ASCII.

pub const MAX_NAME_LEN: usize = 64;

/// Returns true if `name` is lowercase snake_case: `[a-z][a-z0-9_]*`, at most 64 bytes.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= MAX_NAME_LEN
        && first.is_ascii_lowercase()
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
