//! Session registry
//!
//! Ordered list of the decks currently in play, at most one session per deck
//! id. The registry is an ordinary value owned by the application and passed
//! by reference; wrap it in a `tokio::sync::Mutex` to share it between tasks.
//!
//! Positions are not stable identifiers: removing a session shifts every
//! later session down by one.

use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::session::DeckSession;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::info;

/// Active draw sessions in the order they were added
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Vec<DeckSession>,
    /// Source of per-session seeds; `None` seeds each session from entropy
    seeder: Option<StdRng>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose sessions draw reproducible sequences
    pub fn with_seed(seed: u64) -> Self {
        Self {
            sessions: Vec::new(),
            seeder: Some(StdRng::seed_from_u64(seed)),
        }
    }

    /// Put a deck in play
    ///
    /// Fails with [`Error::DuplicateSession`] and leaves the registry
    /// unchanged when the deck already has a session.
    pub fn add(&mut self, deck: Arc<Deck>) -> Result<&mut DeckSession> {
        if self.position_of(deck.id()).is_some() {
            return Err(Error::DuplicateSession {
                deck_id: deck.id().to_string(),
                deck_name: deck.name().to_string(),
            });
        }

        info!(deck = deck.id(), name = deck.name(), "Deck added to play");
        let session = match self.seeder.as_mut() {
            Some(seeder) => DeckSession::with_seed(deck, seeder.gen()),
            None => DeckSession::new(deck),
        };
        self.sessions.push(session);
        let last = self.sessions.len() - 1;
        Ok(&mut self.sessions[last])
    }

    /// Remove the session at `index`, shifting later sessions down
    pub fn remove(&mut self, index: usize) -> Result<DeckSession> {
        if index >= self.sessions.len() {
            return Err(Error::SessionIndex {
                index,
                len: self.sessions.len(),
            });
        }
        let session = self.sessions.remove(index);
        info!(deck = session.deck().id(), "Deck removed from play");
        Ok(session)
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn list(&self) -> &[DeckSession] {
        &self.sessions
    }

    pub fn get(&self, index: usize) -> Option<&DeckSession> {
        self.sessions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut DeckSession> {
        self.sessions.get_mut(index)
    }

    /// Current position of the session for `deck_id`, if it is in play
    pub fn position_of(&self, deck_id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.deck().id() == deck_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
