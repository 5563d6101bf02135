//! # Carta Common Library
//!
//! Core of the Carta deck tool:
//! - Deck definitions and import validation
//! - Persistent deck store (SQLite)
//! - Draw sessions and the session registry
//! - Configuration loading
//! - First-run seeding of bundled decks

pub mod config;
pub mod db;
pub mod deck;
pub mod error;
pub mod registry;
pub mod seed;
pub mod session;
pub mod uuid_utils;
pub mod validate;

pub use db::DeckStore;
pub use deck::{Card, Deck};
pub use error::{Error, Result, StoreOperation, ValidationErrors};
pub use registry::SessionRegistry;
pub use session::DeckSession;
pub use validate::{validate, Validation};
