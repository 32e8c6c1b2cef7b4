use serde::{Deserialize, Serialize};

use crate::hand::CombinationKind;
use crate::player::PlayerId;

/// Outbound notifications, queued by the engine and drained by the host.
/// Cards travel as integer codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    TableUpdated {
        cards: Vec<u16>,
    },
    /// Full remaining deck, front first, after every deal.
    DeckSynced {
        cards: Vec<u16>,
    },
    HandDealt {
        player_id: PlayerId,
        cards: Vec<u16>,
    },
    CardPlayed {
        player_id: PlayerId,
        card: u16,
    },
    CardsCaptured {
        player_id: PlayerId,
        cards: Vec<u16>,
    },
    ScoreChanged {
        player_id: PlayerId,
        score: u32,
    },
    CombinationAnnounced {
        player_id: PlayerId,
        kind: CombinationKind,
        rank: u8,
    },
    TurnChanged {
        player_id: PlayerId,
    },
    TurnWarning {
        player_id: PlayerId,
    },
    TurnTimeout {
        player_id: PlayerId,
    },
    RoundEnded {
        winner: Option<PlayerId>,
        bonus: u32,
    },
    GameOver {
        winner: PlayerId,
        final_score: [u32; 2],
    },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::TableUpdated { .. } => "table_updated",
            GameEvent::DeckSynced { .. } => "deck_synced",
            GameEvent::HandDealt { .. } => "hand_dealt",
            GameEvent::CardPlayed { .. } => "card_played",
            GameEvent::CardsCaptured { .. } => "cards_captured",
            GameEvent::ScoreChanged { .. } => "score_changed",
            GameEvent::CombinationAnnounced { .. } => "combination_announced",
            GameEvent::TurnChanged { .. } => "turn_changed",
            GameEvent::TurnWarning { .. } => "turn_warning",
            GameEvent::TurnTimeout { .. } => "turn_timeout",
            GameEvent::RoundEnded { .. } => "round_ended",
            GameEvent::GameOver { .. } => "game_over",
        }
    }
}

/// Inbound requests from a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    PlayCard { player_id: PlayerId, card_code: u16 },
    RequestDeal,
}
