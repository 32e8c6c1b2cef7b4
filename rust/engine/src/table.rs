use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Face-up cards available for capture, in the order they were laid down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    cards: Vec<Card>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn remove(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(idx) => {
                self.cards.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes every listed card that is present; returns how many were removed.
    pub fn remove_all(&mut self, cards: &[Card]) -> usize {
        let before = self.cards.len();
        self.cards.retain(|c| !cards.contains(c));
        before - self.cards.len()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn codes(&self) -> Vec<u16> {
        self.cards.iter().map(|c| c.code()).collect()
    }
}
