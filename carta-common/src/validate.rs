//! Structural validation of raw deck payloads
//!
//! Every externally sourced deck (file, pasted text, bundled seed data) passes
//! through [`validate`] before a [`crate::deck::Deck`] is built from it.
//! All rules are checked; the result lists every violation in rule order.

use crate::error::{Error, Result, ValidationErrors};
use serde_json::Value;

/// Key holding the card list in the serialized deck form
pub const CARDS_KEY: &str = "options";

/// Accepted alternative spelling of [`CARDS_KEY`] on input
pub const CARDS_KEY_ALIAS: &str = "cards";

/// Outcome of validating one payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Validation {
    /// Convert into a `Result`, carrying all messages on failure
    pub fn into_result(self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(Error::Validation(ValidationErrors(self.errors)))
        }
    }
}

/// Look up the card list, preferring `options` over `cards`
pub(crate) fn card_list(config: &Value) -> Option<&Value> {
    config
        .get(CARDS_KEY)
        .or_else(|| config.get(CARDS_KEY_ALIAS))
}

fn non_empty_str(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.is_empty())
}

/// Validate a raw deck payload
pub fn validate(config: &Value) -> Validation {
    let mut errors = Vec::new();

    if !non_empty_str(config.get("name")) {
        errors.push(r#"Deck must have a "name" field (string)"#.to_string());
    }

    match card_list(config) {
        Some(Value::Array(cards)) if cards.is_empty() => {
            errors.push(r#"Deck must have at least one card in "options""#.to_string());
        }
        Some(Value::Array(cards)) => {
            for (i, card) in cards.iter().enumerate() {
                if !non_empty_str(card.get("title")) {
                    errors.push(format!(r#"Card at index {i} must have a "title" field (string)"#));
                }
            }
        }
        _ => {
            errors.push(r#"Deck must have an "options" field (array)"#.to_string());
        }
    }

    match config.get("id") {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) if !s.is_empty() => {}
        Some(_) => errors.push(r#"Deck "id" must be a non-empty string when present"#.to_string()),
    }

    match config.get("coverImage") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => errors.push(r#"Deck "coverImage" must be a string when present"#.to_string()),
    }

    Validation {
        valid: errors.is_empty(),
        errors,
    }
}
