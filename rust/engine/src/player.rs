use crate::cards::Card;
use crate::errors::GameError;

/// Seat index of a player, `0` or `1`.
pub type PlayerId = usize;

/// Ronda is strictly a two-player game.
pub const NUM_PLAYERS: usize = 2;

pub fn opponent(id: PlayerId) -> PlayerId {
    1 - id
}

/// Represents one of the two players: the cards they hold, the cards they
/// captured this round, and their running score.
#[derive(Debug, Clone)]
pub struct Player {
    /// Player identifier (0 or 1)
    id: PlayerId,
    /// Cards currently in hand (at most three)
    hand: Vec<Card>,
    /// Cards captured during the current round
    captured: Vec<Card>,
    /// Accumulated score, carried across rounds
    score: u32,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            hand: Vec::with_capacity(3),
            captured: Vec::new(),
            score: 0,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn captured(&self) -> &[Card] {
        &self.captured
    }

    pub fn captured_count(&self) -> usize {
        self.captured.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn has_card(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    pub fn give_cards(&mut self, cards: &[Card]) {
        self.hand.extend_from_slice(cards);
    }

    pub fn take_card(&mut self, card: Card) -> Result<Card, GameError> {
        match self.hand.iter().position(|&c| c == card) {
            Some(idx) => Ok(self.hand.remove(idx)),
            None => Err(GameError::CardNotInHand {
                player: self.id,
                code: card.code(),
            }),
        }
    }

    pub fn capture(&mut self, cards: &[Card]) {
        self.captured.extend_from_slice(cards);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Clears hand and captured pile for a new round; the score is kept.
    pub fn reset_round(&mut self) {
        self.hand.clear();
        self.captured.clear();
    }
}
