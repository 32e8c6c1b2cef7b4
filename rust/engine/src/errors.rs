use thiserror::Error;

use crate::player::PlayerId;
use crate::round::RoundPhase;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid card code: {code}")]
    InvalidCardCode { code: u16 },
    #[error("Deck is empty")]
    DeckEmpty,
    #[error("Could not deal a valid opening table after {attempts} attempts")]
    DealFailed { attempts: u32 },
    #[error("It's not player {player}'s turn")]
    NotPlayersTurn { player: PlayerId },
    #[error("Player {player} does not hold card {code}")]
    CardNotInHand { player: PlayerId, code: u16 },
    #[error("Invalid deck: {0}")]
    InvalidDeck(String),
    #[error("Unknown player {player}")]
    UnknownPlayer { player: PlayerId },
    #[error("Operation not allowed while the round is {phase:?}")]
    InvalidPhase { phase: RoundPhase },
    #[error("Turn has not timed out")]
    TurnStillActive,
    #[error("Game is already over")]
    GameAlreadyOver,
}
