//! UUID utilities

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Generate a fresh deck identifier in hyphenated string form
pub fn new_deck_id() -> String {
    generate().hyphenated().to_string()
}
