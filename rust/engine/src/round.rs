use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::{detect_combinations, Combination, CombinationFlags};
use crate::player::{opponent, Player, PlayerId};
use crate::rules::{
    capture_set, extra_card_points, hand_deal_size, is_valid_table, score_capture, CaptureScore,
    RuleSet, TABLE_DEAL_SIZE,
};
use crate::table::Table;

/// Lifecycle of a round, from the opening deal to game end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    NotStarted,
    DealingTable,
    DealingHands,
    Playing,
    /// Both hands are empty and the deck can refill them.
    RoundExhausted,
    RoundOver,
    GameOver,
}

/// Cards handed out by one hand deal plus the combinations it scored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandDeal {
    pub hands: [Vec<Card>; 2],
    pub combinations: Vec<(PlayerId, Combination)>,
}

/// What a single play did to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayResolution {
    pub card: Card,
    /// Table cards taken, in table order. Empty when the card was laid down.
    pub captured: Vec<Card>,
    pub score: CaptureScore,
    /// The play emptied the deck and both hands.
    pub last_play: bool,
}

/// One round of play: the deck, the table, and the discard pile.
#[derive(Debug, Clone)]
pub struct Round {
    number: u32,
    phase: RoundPhase,
    deck: Deck,
    table: Table,
    discarded: Vec<Card>,
    combos: CombinationFlags,
    // deal the first table in deck order instead of shuffling
    stacked: bool,
}

impl Round {
    pub fn new(number: u32, deck: Deck) -> Self {
        Self {
            number,
            phase: RoundPhase::NotStarted,
            deck,
            table: Table::new(),
            discarded: Vec::new(),
            combos: CombinationFlags::default(),
            stacked: false,
        }
    }

    /// A round whose deck is used in its given order. Rejected opening
    /// tables still trigger a reshuffle.
    pub fn stacked(number: u32, deck: Deck) -> Self {
        Self {
            stacked: true,
            ..Self::new(number, deck)
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: RoundPhase) {
        self.phase = phase;
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn discarded(&self) -> &[Card] {
        &self.discarded
    }

    pub fn combination_flags(&self) -> &CombinationFlags {
        &self.combos
    }

    /// Shuffles and lays down the opening table.
    ///
    /// A draw containing a shared or adjacent rank goes back to the front of
    /// the deck, the deck is reshuffled and the draw repeated. Fails with
    /// [`GameError::DealFailed`] after `max_attempts` rejections, leaving the
    /// deck complete.
    pub fn deal_table(&mut self, max_attempts: u32) -> Result<Vec<Card>, GameError> {
        if self.phase != RoundPhase::NotStarted {
            return Err(GameError::InvalidPhase { phase: self.phase });
        }
        self.phase = RoundPhase::DealingTable;
        if !self.stacked {
            self.deck.shuffle();
        }

        for attempt in 1..=max_attempts {
            let cards = self.deck.draw_n(TABLE_DEAL_SIZE);
            if cards.len() < TABLE_DEAL_SIZE {
                self.deck.return_to_front(&cards);
                self.phase = RoundPhase::NotStarted;
                return Err(GameError::DeckEmpty);
            }
            if is_valid_table(&cards) {
                debug!(round = self.number, attempt, table = ?cards, "opening table dealt");
                self.table = Table::from_cards(cards.clone());
                self.phase = RoundPhase::DealingHands;
                return Ok(cards);
            }
            warn!(round = self.number, attempt, table = ?cards, "opening table rejected");
            self.deck.return_to_front(&cards);
            self.deck.shuffle();
        }

        self.phase = RoundPhase::NotStarted;
        Err(GameError::DealFailed {
            attempts: max_attempts,
        })
    }

    /// Deals a hand to each player and scores the combinations found, each
    /// kind at most once per round.
    pub fn deal_hands(&mut self, players: &mut [Player; 2]) -> Result<HandDeal, GameError> {
        if !matches!(
            self.phase,
            RoundPhase::DealingHands | RoundPhase::RoundExhausted
        ) {
            return Err(GameError::InvalidPhase { phase: self.phase });
        }
        let size = hand_deal_size(self.deck.remaining());
        if size == 0 {
            return Err(GameError::DeckEmpty);
        }

        let mut deal = HandDeal::default();
        for (id, player) in players.iter_mut().enumerate() {
            let cards = self.deck.draw_n(size);
            player.give_cards(&cards);
            deal.hands[id] = cards;
        }
        for (id, player) in players.iter_mut().enumerate() {
            for combo in detect_combinations(player.hand()) {
                if self.combos.claim(combo.kind) {
                    player.add_score(combo.kind.points());
                    deal.combinations.push((id, combo));
                }
            }
        }
        debug!(
            round = self.number,
            size,
            remaining = self.deck.remaining(),
            "hands dealt"
        );
        self.phase = RoundPhase::Playing;
        Ok(deal)
    }

    /// Computes what playing `card` would capture and score, without mutating.
    pub fn preview(
        &self,
        players: &[Player; 2],
        id: PlayerId,
        card: Card,
        rules: &RuleSet,
    ) -> PlayResolution {
        let captured = capture_set(card, self.table.cards());
        let own_left = players[id].hand().iter().filter(|&&c| c != card).count();
        let last_play =
            self.deck.is_empty() && own_left == 0 && players[opponent(id)].hand().is_empty();
        let score = score_capture(&captured, rules.scoring, last_play);
        PlayResolution {
            card,
            captured,
            score,
            last_play,
        }
    }

    /// Moves `card` from the player's hand onto the table or, with its
    /// capture set, into their pile. Points are not applied here.
    pub fn apply_play(
        &mut self,
        players: &mut [Player; 2],
        id: PlayerId,
        card: Card,
        rules: &RuleSet,
    ) -> Result<PlayResolution, GameError> {
        if self.phase != RoundPhase::Playing {
            return Err(GameError::InvalidPhase { phase: self.phase });
        }
        let resolution = self.preview(players, id, card, rules);
        let player = &mut players[id];
        player.take_card(card)?;

        if resolution.captured.is_empty() {
            self.table.add(card);
        } else {
            self.table.remove_all(&resolution.captured);
            player.capture(&resolution.captured);
            if rules.played_card_to_pile {
                player.capture(&[card]);
            } else {
                self.discarded.push(card);
            }
        }
        Ok(resolution)
    }

    /// Moves to the next phase once both hands are empty.
    pub fn after_play(&mut self, players: &[Player; 2]) -> RoundPhase {
        if players.iter().all(|p| p.hand().is_empty()) {
            self.phase = if self.deck.remaining() >= 2 {
                RoundPhase::RoundExhausted
            } else {
                RoundPhase::RoundOver
            };
        }
        self.phase
    }

    /// Awards the extra-card bonus. Returns the player with more captured
    /// cards, if any, and the bonus they received.
    pub fn finish(&mut self, players: &mut [Player; 2]) -> (Option<PlayerId>, u32) {
        self.phase = RoundPhase::RoundOver;
        let counts = [players[0].captured_count(), players[1].captured_count()];
        let leader = match counts[0].cmp(&counts[1]) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        };
        let bonus = match leader {
            Some(id) => {
                let points = extra_card_points(counts[id], counts[opponent(id)]);
                players[id].add_score(points);
                points
            }
            None => 0,
        };
        (leader, bonus)
    }
}
