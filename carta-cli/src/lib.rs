//! Carta command-line front end
//!
//! Thin layer over `carta-common`: argument parsing, command dispatch, and
//! the interactive play loop.

pub mod cli;
pub mod commands;
pub mod play;

/// Decks imported into an empty store on first run, as `(label, json)`
pub const BUNDLED_DECKS: &[(&str, &str)] = &[(
    "sample-deck.json",
    include_str!("../data/sample-deck.json"),
)];
