//! One-shot command handlers
//!
//! Handlers write user-facing output to `out` and return failures to the
//! caller, which prints them and exits non-zero.

use crate::cli::Command;
use crate::play;
use crate::BUNDLED_DECKS;
use anyhow::{bail, Context, Result};
use carta_common::seed::seed_if_empty;
use carta_common::{validate, Card, DeckSession, DeckStore, SessionRegistry};
use serde_json::Value;
use std::io::{self, BufRead, Read, Write};
use std::sync::Arc;
use tracing::info;

/// Read deck JSON from a file path, or from stdin when `source` is "-"
pub fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read deck from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {source}"))
    }
}

/// Run a command; `input` feeds the interactive `play` loop
pub async fn run<R: BufRead, W: Write>(
    command: Command,
    store: &DeckStore,
    input: R,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Import { source } => import(store, &read_source(&source)?, out).await,
        Command::Validate { source } => validate_text(&read_source(&source)?, out),
        Command::List => list(store, out).await,
        Command::Show { id } => show(store, &id, out).await,
        Command::Delete { id } => {
            store.delete(&id).await?;
            writeln!(out, "Deleted {id}")?;
            Ok(())
        }
        Command::Clear => {
            store.clear_all().await?;
            writeln!(out, "All decks deleted")?;
            Ok(())
        }
        Command::Reset => {
            store.reset_store().await?;
            writeln!(out, "Database deleted: {}", store.path().display())?;
            Ok(())
        }
        Command::Seed => seed(store, out).await,
        Command::Draw {
            id,
            count,
            always_shuffle,
            seed,
        } => draw(store, &id, count, always_shuffle, seed, out).await,
        Command::Play => {
            let mut registry = SessionRegistry::new();
            play::run(store, &mut registry, input, out).await
        }
    }
}

pub async fn import<W: Write>(store: &DeckStore, text: &str, out: &mut W) -> Result<()> {
    let deck = store.import_json(text).await?;
    writeln!(
        out,
        "Imported \"{}\" ({} cards) as {}",
        deck.name(),
        deck.total_cards(),
        deck.id()
    )?;
    Ok(())
}

pub fn validate_text<W: Write>(text: &str, out: &mut W) -> Result<()> {
    let config: Value = serde_json::from_str(text).context("Deck is not valid JSON")?;
    let validation = validate(&config);
    if validation.valid {
        let cards = carta_common::Deck::from_config(&config)?.total_cards();
        writeln!(out, "Valid deck ({cards} cards)")?;
        return Ok(());
    }
    for error in &validation.errors {
        writeln!(out, "  - {error}")?;
    }
    bail!("Deck has {} problem(s)", validation.errors.len())
}

pub async fn list<W: Write>(store: &DeckStore, out: &mut W) -> Result<()> {
    let decks = store.get_all().await?;
    if decks.is_empty() {
        writeln!(out, "No decks imported yet.")?;
        return Ok(());
    }
    writeln!(out, "Your Decks ({})", decks.len())?;
    for deck in &decks {
        writeln!(out, "{}  {}  ({} cards)", deck.id(), deck.name(), deck.total_cards())?;
    }
    Ok(())
}

pub async fn show<W: Write>(store: &DeckStore, id: &str, out: &mut W) -> Result<()> {
    let Some(deck) = store.get(id).await? else {
        bail!("No deck with id {id}");
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&deck.to_config())?)?;
    Ok(())
}

pub async fn seed<W: Write>(store: &DeckStore, out: &mut W) -> Result<()> {
    let report = seed_if_empty(store, BUNDLED_DECKS).await?;
    if report.is_empty() {
        writeln!(out, "Store already has decks; nothing seeded")?;
    }
    for id in &report.imported {
        writeln!(out, "Seeded {id}")?;
    }
    for (label, message) in &report.failed {
        writeln!(out, "Failed to seed {label}: {message}")?;
    }
    Ok(())
}

pub async fn draw<W: Write>(
    store: &DeckStore,
    id: &str,
    count: usize,
    always_shuffle: bool,
    seed: Option<u64>,
    out: &mut W,
) -> Result<()> {
    let Some(deck) = store.get(id).await? else {
        bail!("No deck with id {id}");
    };
    let deck = Arc::new(deck);
    let mut session = match seed {
        Some(seed) => DeckSession::with_seed(deck, seed),
        None => DeckSession::new(deck),
    };
    session.set_always_shuffle(always_shuffle);

    info!(deck = id, count, always_shuffle, "Drawing");
    for _ in 0..count {
        match session.draw() {
            Some(card) => write_card(card, out)?,
            None => {
                writeln!(out, "The deck is empty. Shuffle to draw again.")?;
                break;
            }
        }
    }
    writeln!(
        out,
        "{} of {} cards remaining",
        session.remaining_count(),
        session.total_cards()
    )?;
    Ok(())
}

/// Print a card's title and description
pub fn write_card<W: Write>(card: &Card, out: &mut W) -> Result<()> {
    writeln!(out, "* {}", card.title)?;
    if let Some(description) = card.description() {
        writeln!(out, "  {description}")?;
    }
    Ok(())
}
