//! First-run seeding of bundled decks
//!
//! Bundled decks are imported only into an empty store, so a user who has
//! deleted the samples never gets them back behind their back.

use crate::db::DeckStore;
use crate::error::Result;
use tracing::{info, warn};

/// Outcome of a seeding pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Ids of decks that were imported, in bundle order
    pub imported: Vec<String>,
    /// `(label, message)` for each bundled deck that could not be imported
    pub failed: Vec<(String, String)>,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.imported.is_empty() && self.failed.is_empty()
    }
}

/// Import `bundled` `(label, json)` decks when the store has no decks yet
///
/// A deck that fails to parse, validate, or save is recorded in the report
/// and the remaining decks are still imported. Failing to query the store at
/// all is returned as an error.
pub async fn seed_if_empty(store: &DeckStore, bundled: &[(&str, &str)]) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if store.has_any().await? {
        return Ok(report);
    }

    info!("First run: loading {} bundled decks", bundled.len());

    for (label, text) in bundled {
        match store.import_json(text).await {
            Ok(deck) => {
                info!("Loaded: {}", deck.name());
                report.imported.push(deck.id().to_string());
            }
            Err(e) => {
                warn!("Failed to load {}: {}", label, e);
                report.failed.push((label.to_string(), e.to_string()));
            }
        }
    }

    Ok(report)
}
