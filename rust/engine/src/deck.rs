use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

pub const DECK_SIZE: usize = 40;

/// An ordered, consumable deck. Cards are drawn from the front; `position`
/// marks how many have left the deck so far.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep canonical order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            position: 0,
            rng,
        }
    }

    /// Full deck with a freshly drawn random seed.
    pub fn new_full() -> Self {
        Self::new_with_seed(rand::random())
    }

    /// Rebuilds a deck from card codes, front first, without shuffling.
    ///
    /// Used to mirror the authoritative deck on a remote participant, so a
    /// partial deck is accepted; duplicates are not.
    pub fn from_codes(codes: &[u16]) -> Result<Self, GameError> {
        let mut seen = HashSet::with_capacity(codes.len());
        let mut cards = Vec::with_capacity(codes.len());
        for &code in codes {
            let card = Card::from_code(code)?;
            if !seen.insert(card) {
                return Err(GameError::InvalidDeck(format!("duplicate card {}", code)));
            }
            cards.push(card);
        }
        Ok(Self {
            cards,
            position: 0,
            rng: ChaCha20Rng::seed_from_u64(0),
        })
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
    }

    /// Fisher-Yates over the cards still in the deck.
    pub fn shuffle(&mut self) {
        self.cards[self.position..].shuffle(&mut self.rng);
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        if self.position >= self.cards.len() {
            Err(GameError::DeckEmpty)
        } else {
            let c = self.cards[self.position];
            self.position += 1;
            Ok(c)
        }
    }

    /// Draws up to `k` cards, stopping early once the deck runs out.
    pub fn draw_n(&mut self, k: usize) -> Vec<Card> {
        (0..k).map_while(|_| self.draw().ok()).collect()
    }

    /// Puts previously drawn cards back on top, in the given order.
    pub fn return_to_front(&mut self, returned: &[Card]) {
        let rest = self.cards.split_off(self.position);
        self.cards.clear();
        self.cards.extend_from_slice(returned);
        self.cards.extend(rest);
        self.position = 0;
    }

    pub fn reset(&mut self) {
        self.cards = full_deck();
        self.position = 0;
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Cards still in the deck, front first.
    pub fn cards(&self) -> &[Card] {
        &self.cards[self.position..]
    }

    pub fn codes(&self) -> Vec<u16> {
        self.cards().iter().map(|c| c.code()).collect()
    }

    /// True iff the remaining cards are exactly the 40 cards of the game.
    pub fn is_valid(&self) -> bool {
        is_complete_deck(self.cards())
    }

    /// Full-game accounting: remaining cards plus `dealt` make up the 40.
    pub fn is_valid_with(&self, dealt: &[Card]) -> bool {
        let all: Vec<Card> = self.cards().iter().chain(dealt).copied().collect();
        is_complete_deck(&all)
    }
}

/// Every legal card exactly once. Cards cannot hold illegal ranks, so 40
/// distinct cards are necessarily the full set.
pub fn is_complete_deck(cards: &[Card]) -> bool {
    if cards.len() != DECK_SIZE {
        return false;
    }
    let unique: HashSet<&Card> = cards.iter().collect();
    unique.len() == DECK_SIZE
}
