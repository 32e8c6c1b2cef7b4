use serde::{Deserialize, Serialize};

use crate::cards::{decode_all, Card};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::player::PlayerId;
use crate::round::RoundPhase;

/// Serializable authoritative state, cards as integer codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub round: u32,
    pub phase: RoundPhase,
    /// Remaining deck, front first
    pub deck: Vec<u16>,
    pub table: Vec<u16>,
    pub hands: [Vec<u16>; 2],
    pub captured: [Vec<u16>; 2],
    #[serde(default)]
    pub discarded: Vec<u16>,
    pub scores: [u32; 2],
    /// Player whose turn is running, `None` while no turn is active
    pub current_player: Option<PlayerId>,
}

/// Read-only copy of a game held by a non-authoritative participant.
#[derive(Debug, Clone)]
pub struct Mirror {
    snapshot: Snapshot,
    deck: Deck,
    table: Vec<Card>,
    hands: [Vec<Card>; 2],
    captured: [Vec<Card>; 2],
}

impl Mirror {
    /// Rebuilds a mirror, checking that deck, table, hands, piles and
    /// discards together hold each of the 40 cards exactly once.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, GameError> {
        let deck = Deck::from_codes(&snapshot.deck)?;
        let table = decode_all(&snapshot.table)?;
        let hands = [
            decode_all(&snapshot.hands[0])?,
            decode_all(&snapshot.hands[1])?,
        ];
        let captured = [
            decode_all(&snapshot.captured[0])?,
            decode_all(&snapshot.captured[1])?,
        ];
        let discarded = decode_all(&snapshot.discarded)?;

        let mut elsewhere: Vec<Card> = table.clone();
        elsewhere.extend(hands.iter().flatten());
        elsewhere.extend(captured.iter().flatten());
        elsewhere.extend(discarded);
        if !deck.is_valid_with(&elsewhere) {
            return Err(GameError::InvalidDeck(format!(
                "snapshot accounts for {} cards, expected the 40 distinct cards",
                deck.remaining() + elsewhere.len()
            )));
        }

        Ok(Self {
            snapshot,
            deck,
            table,
            hands,
            captured,
        })
    }

    /// Replaces the mirror with `snapshot` if it is valid; otherwise the
    /// current state is kept and the error returned.
    pub fn apply(&mut self, snapshot: Snapshot) -> Result<(), GameError> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn table(&self) -> &[Card] {
        &self.table
    }

    pub fn hand(&self, id: PlayerId) -> &[Card] {
        self.hands.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn captured(&self, id: PlayerId) -> &[Card] {
        self.captured.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn scores(&self) -> [u32; 2] {
        self.snapshot.scores
    }

    pub fn phase(&self) -> RoundPhase {
        self.snapshot.phase
    }

    pub fn is_players_turn(&self, id: PlayerId) -> bool {
        self.snapshot.phase == RoundPhase::Playing && self.snapshot.current_player == Some(id)
    }
}
