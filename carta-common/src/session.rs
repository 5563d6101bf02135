//! Draw sessions
//!
//! A [`DeckSession`] is the ephemeral play state over one shared [`Deck`]:
//! which positions have been drawn since the last shuffle, whether draws are
//! made with replacement, and the card most recently drawn. Sessions are
//! never persisted.
//!
//! # Replacement mode
//!
//! With `always_shuffle` off, each draw removes the card from the pile until
//! [`DeckSession::shuffle`]. With it on, every draw samples the full deck and
//! records nothing. Toggling the flag never clears history, so switching
//! back off resumes the pile exactly where it was left.

use crate::deck::{Card, Deck};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Play state for one deck in play
#[derive(Debug)]
pub struct DeckSession {
    deck: Arc<Deck>,
    rng: StdRng,
    always_shuffle: bool,
    drawn: BTreeSet<usize>,
    current: Option<usize>,
}

impl DeckSession {
    /// Start a fresh session seeded from OS entropy
    pub fn new(deck: Arc<Deck>) -> Self {
        Self::with_rng(deck, StdRng::from_entropy())
    }

    /// Start a fresh session with a reproducible draw sequence
    pub fn with_seed(deck: Arc<Deck>, seed: u64) -> Self {
        Self::with_rng(deck, StdRng::seed_from_u64(seed))
    }

    fn with_rng(deck: Arc<Deck>, rng: StdRng) -> Self {
        Self {
            deck,
            rng,
            always_shuffle: false,
            drawn: BTreeSet::new(),
            current: None,
        }
    }

    pub fn deck(&self) -> &Arc<Deck> {
        &self.deck
    }

    pub fn always_shuffle(&self) -> bool {
        self.always_shuffle
    }

    /// Switch replacement mode; drawn history and current card are kept
    pub fn set_always_shuffle(&mut self, value: bool) {
        self.always_shuffle = value;
    }

    pub fn total_cards(&self) -> usize {
        self.deck.total_cards()
    }

    /// Cards left in the pile; the full deck while replacement is on
    pub fn remaining_count(&self) -> usize {
        if self.always_shuffle {
            self.total_cards()
        } else {
            self.total_cards() - self.drawn.len()
        }
    }

    pub fn drawn_count(&self) -> usize {
        self.drawn.len()
    }

    /// True only when drawing without replacement and the pile is used up
    pub fn is_empty(&self) -> bool {
        !self.always_shuffle && self.remaining_count() == 0
    }

    /// Positions already drawn since the last shuffle, ascending
    pub fn drawn_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.drawn.iter().copied()
    }

    /// Positions the next draw may select from
    pub fn remaining_indices(&self) -> Vec<usize> {
        let all = 0..self.total_cards();
        if self.always_shuffle {
            all.collect()
        } else {
            all.filter(|i| !self.drawn.contains(i)).collect()
        }
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current.and_then(|i| self.deck.card(i))
    }

    /// Position of the most recently drawn card
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Draw one card uniformly at random from the pile
    ///
    /// Returns `None` when the pile is exhausted; the session is left
    /// untouched in that case.
    pub fn draw(&mut self) -> Option<&Card> {
        let pool = self.remaining_indices();
        let index = *pool.choose(&mut self.rng)?;

        if !self.always_shuffle {
            self.drawn.insert(index);
        }
        self.current = Some(index);

        debug!(
            deck = self.deck.id(),
            index,
            remaining = self.remaining_count(),
            "Drew card"
        );
        self.deck.card(index)
    }

    /// Return every drawn card to the pile and forget the current card
    pub fn shuffle(&mut self) {
        self.drawn.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn deck_of(n: usize) -> Arc<Deck> {
        let options: Vec<_> = (0..n).map(|i| json!({"title": format!("Card {i}")})).collect();
        Arc::new(Deck::from_config(&json!({"name": "Test", "options": options})).unwrap())
    }

    #[test]
    fn test_fresh_session_state() {
        let session = DeckSession::with_seed(deck_of(3), 1);
        assert_eq!(session.remaining_count(), 3);
        assert_eq!(session.drawn_count(), 0);
        assert!(!session.is_empty());
        assert!(!session.always_shuffle());
        assert!(session.current_card().is_none());
    }

    #[test]
    fn test_draw_without_replacement_never_repeats() {
        for size in 1..=12 {
            for seed in 0..8 {
                let mut session = DeckSession::with_seed(deck_of(size), seed);
                let mut seen = HashSet::new();
                for _ in 0..size {
                    let title = session.draw().expect("pile not exhausted").title.clone();
                    assert!(seen.insert(title), "card repeated before shuffle");
                }
                assert!(session.is_empty());
                assert_eq!(session.remaining_count(), 0);
                assert_eq!(session.drawn_count(), size);
                assert!(session.draw().is_none());
            }
        }
    }

    #[test]
    fn test_draw_on_exhausted_pile_leaves_state_unchanged() {
        let mut session = DeckSession::with_seed(deck_of(2), 3);
        session.draw();
        let last = session.draw().unwrap().title.clone();

        assert!(session.draw().is_none());
        assert_eq!(session.current_card().unwrap().title, last);
        assert_eq!(session.drawn_count(), 2);
    }

    #[test]
    fn test_replacement_mode_never_empties() {
        let mut session = DeckSession::with_seed(deck_of(3), 9);
        session.set_always_shuffle(true);
        for _ in 0..50 {
            assert!(session.draw().is_some());
            assert_eq!(session.remaining_count(), 3);
            assert!(!session.is_empty());
        }
        assert_eq!(session.drawn_count(), 0);
    }

    #[test]
    fn test_replacement_mode_samples_whole_deck() {
        let mut session = DeckSession::with_seed(deck_of(4), 11);
        session.set_always_shuffle(true);
        let mut seen = HashSet::new();
        for _ in 0..400 {
            session.draw();
            seen.insert(session.current_index().unwrap());
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_shuffle_returns_cards_to_pile() {
        let mut session = DeckSession::with_seed(deck_of(3), 5);
        for _ in 0..3 {
            session.draw();
        }
        assert!(session.draw().is_none());

        session.shuffle();
        assert_eq!(session.remaining_count(), 3);
        assert!(session.current_card().is_none());
        assert!(session.draw().is_some());
    }

    #[test]
    fn test_shuffle_on_fresh_session_is_noop() {
        let mut session = DeckSession::with_seed(deck_of(3), 5);
        session.shuffle();
        assert_eq!(session.remaining_count(), 3);
        assert_eq!(session.drawn_count(), 0);
        assert!(session.current_card().is_none());
        assert_eq!(session.remaining_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_toggle_keeps_history_and_current_card() {
        let mut session = DeckSession::with_seed(deck_of(5), 21);
        session.draw();
        session.draw();
        let current = session.current_index();

        session.set_always_shuffle(true);
        assert_eq!(session.drawn_count(), 2);
        assert_eq!(session.current_index(), current);
        assert_eq!(session.remaining_count(), 5);

        session.set_always_shuffle(false);
        assert_eq!(session.drawn_count(), 2);
        assert_eq!(session.remaining_count(), 3);
    }

    #[test]
    fn test_draws_in_replacement_mode_are_not_recorded() {
        let mut session = DeckSession::with_seed(deck_of(3), 2);
        session.draw();
        session.set_always_shuffle(true);
        for _ in 0..10 {
            session.draw();
        }
        session.set_always_shuffle(false);
        assert_eq!(session.drawn_count(), 1);
        assert_eq!(session.remaining_count(), 2);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let deck = deck_of(10);
        let mut a = DeckSession::with_seed(deck.clone(), 77);
        let mut b = DeckSession::with_seed(deck, 77);
        for _ in 0..10 {
            assert_eq!(a.draw().cloned(), b.draw().cloned());
        }
    }

    #[test]
    fn test_drawn_indices_within_bounds() {
        let mut session = DeckSession::with_seed(deck_of(6), 8);
        for _ in 0..4 {
            session.draw();
        }
        assert!(session.drawn_indices().all(|i| i < 6));
        assert_eq!(session.remaining_indices().len(), 2);
    }
}
