//! Interactive play loop
//!
//! Reads one command per line and applies it to a [`SessionRegistry`].
//! Positions shown to the user are 1-based and shift down after a removal.
//! A failing command prints a short message and the loop carries on.

use crate::commands::write_card;
use anyhow::{anyhow, bail, Result};
use carta_common::{DeckStore, SessionRegistry};
use std::io::{BufRead, Write};
use std::sync::Arc;

const HELP: &str = "\
commands:
  decks              list stored decks
  add <deck-id>      put a deck in play
  list               show decks in play
  draw <pos>         draw a card
  shuffle <pos>      return all drawn cards to the pile
  mode <pos> on|off  draw with replacement on/off
  remove <pos>       take a deck out of play
  clear              take every deck out of play
  help               show this text
  quit               leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    Decks,
    Add(String),
    List,
    Draw(usize),
    Shuffle(usize),
    Mode(usize, bool),
    Remove(usize),
    Clear,
    Help,
    Quit,
}

/// Parse a 1-based position into a registry index
fn position(arg: Option<&str>) -> Result<usize> {
    let arg = arg.ok_or_else(|| anyhow!("missing position"))?;
    match arg.parse::<usize>() {
        Ok(pos) if pos >= 1 => Ok(pos - 1),
        _ => bail!("invalid position: {arg}"),
    }
}

impl PlayCommand {
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let command = match verb {
            "decks" => PlayCommand::Decks,
            "add" => {
                let id = words.next().ok_or_else(|| anyhow!("missing deck id"))?;
                PlayCommand::Add(id.to_string())
            }
            "list" | "ls" => PlayCommand::List,
            "draw" | "d" => PlayCommand::Draw(position(words.next())?),
            "shuffle" => PlayCommand::Shuffle(position(words.next())?),
            "mode" => {
                let index = position(words.next())?;
                let on = match words.next() {
                    Some("on") => true,
                    Some("off") => false,
                    _ => bail!("mode takes on or off"),
                };
                PlayCommand::Mode(index, on)
            }
            "remove" | "rm" => PlayCommand::Remove(position(words.next())?),
            "clear" => PlayCommand::Clear,
            "help" | "?" => PlayCommand::Help,
            "quit" | "exit" | "q" => PlayCommand::Quit,
            other => bail!("unknown command: {other} (try help)"),
        };
        Ok(Some(command))
    }
}

/// Run the loop until `quit` or end of input
pub async fn run<R: BufRead, W: Write>(
    store: &DeckStore,
    registry: &mut SessionRegistry,
    input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{HELP}")?;
    for line in input.lines() {
        let line = line?;
        let command = match PlayCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                continue;
            }
        };
        if command == PlayCommand::Quit {
            break;
        }
        if let Err(e) = apply(command, store, registry, out).await {
            writeln!(out, "error: {e}")?;
        }
    }
    Ok(())
}

/// Apply one command to the registry
pub async fn apply<W: Write>(
    command: PlayCommand,
    store: &DeckStore,
    registry: &mut SessionRegistry,
    out: &mut W,
) -> Result<()> {
    match command {
        PlayCommand::Decks => crate::commands::list(store, out).await?,
        PlayCommand::Add(id) => {
            let deck = store
                .get(&id)
                .await?
                .ok_or_else(|| anyhow!("No deck with id {id}"))?;
            let session = registry.add(Arc::new(deck))?;
            writeln!(out, "Now playing \"{}\"", session.deck().name())?;
        }
        PlayCommand::List => {
            if registry.is_empty() {
                writeln!(out, "No decks in play")?;
            }
            for (i, session) in registry.list().iter().enumerate() {
                writeln!(
                    out,
                    "{}. {}  {}/{} remaining{}",
                    i + 1,
                    session.deck().name(),
                    session.remaining_count(),
                    session.total_cards(),
                    if session.always_shuffle() { "  [always shuffle]" } else { "" }
                )?;
            }
        }
        PlayCommand::Draw(index) => {
            let session = session_at(registry, index)?;
            match session.draw() {
                Some(card) => write_card(card, out)?,
                None => writeln!(out, "The deck is empty. Shuffle to draw again.")?,
            }
        }
        PlayCommand::Shuffle(index) => {
            let session = session_at(registry, index)?;
            session.shuffle();
            writeln!(out, "Shuffled \"{}\"", session.deck().name())?;
        }
        PlayCommand::Mode(index, on) => {
            let session = session_at(registry, index)?;
            session.set_always_shuffle(on);
            writeln!(
                out,
                "Always shuffle {} for \"{}\"",
                if on { "on" } else { "off" },
                session.deck().name()
            )?;
        }
        PlayCommand::Remove(index) => {
            let session = registry.remove(index)?;
            writeln!(out, "Removed \"{}\"", session.deck().name())?;
        }
        PlayCommand::Clear => {
            registry.clear();
            writeln!(out, "Cleared all decks from play")?;
        }
        PlayCommand::Help => writeln!(out, "{HELP}")?,
        PlayCommand::Quit => {}
    }
    Ok(())
}

fn session_at(
    registry: &mut SessionRegistry,
    index: usize,
) -> Result<&mut carta_common::DeckSession> {
    registry
        .get_mut(index)
        .ok_or_else(|| anyhow!("Nothing in play at position {}", index + 1))
}
