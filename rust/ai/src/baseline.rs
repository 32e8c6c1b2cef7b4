//! Baseline AI implementation for Ronda.
//!
//! Plays greedily: takes the capture worth the most points, and when no card
//! captures lays down the card that gives the opponent the least to take.

use crate::AIOpponent;
use ronda_engine::cards::{Card, Rank};
use ronda_engine::engine::Engine;
use ronda_engine::player::PlayerId;
use ronda_engine::rules::{ASHRA_POINTS, KHAMSA_POINTS, WAHED_POINTS};

/// Simple baseline AI implementation for testing and comparison.
///
/// # Strategy
///
/// **Capturing:** every card in hand is previewed against the table; the
/// play with the highest point total wins, ties broken by the number of
/// cards taken.
///
/// **Laying down:** each card is given a risk score, lowest first:
/// - the bonus the opponent would collect by capturing it (1, 5 or 10)
/// - one point per table card it would form a run with
/// - one point per copy of its rank still unseen
///
/// # Example
///
/// ```rust
/// use ronda_ai::baseline::BaselineAI;
/// use ronda_ai::AIOpponent;
/// use ronda_engine::engine::Engine;
/// use ronda_engine::rules::RuleSet;
///
/// let ai = BaselineAI::new();
/// assert_eq!(ai.name(), "BaselineAI");
///
/// let mut engine = Engine::new(Some(42), RuleSet::default());
/// engine.start().expect("opening deal");
/// let player = engine.current_player();
/// assert!(ai.choose_card(&engine, player).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct BaselineAI;

impl BaselineAI {
    pub fn new() -> Self {
        Self
    }

    fn best_capture(engine: &Engine, player_id: PlayerId, hand: &[Card]) -> Option<Card> {
        let round = engine.round();
        hand.iter()
            .map(|&card| {
                let r = round.preview(engine.players(), player_id, card, engine.rules());
                (card, r.score.total(), r.captured.len())
            })
            .filter(|&(_, _, taken)| taken > 0)
            .fold(None, |best: Option<(Card, u32, usize)>, cand| match best {
                Some(b) if (b.1, b.2) >= (cand.1, cand.2) => Some(b),
                _ => Some(cand),
            })
            .map(|(card, _, _)| card)
    }

    fn bonus_exposure(rank: Rank) -> u32 {
        match rank {
            Rank::One => WAHED_POINTS,
            Rank::Five => KHAMSA_POINTS,
            Rank::Ten => ASHRA_POINTS,
            _ => 0,
        }
    }

    /// Copies of `rank` that are neither visible to `player_id` nor gone.
    fn unseen(engine: &Engine, player_id: PlayerId, rank: Rank) -> u32 {
        let own = engine.players()[player_id].hand().iter();
        let table = engine.table().iter();
        let piles = engine.players().iter().flat_map(|p| p.captured().iter());
        let discarded = engine.round().discarded().iter();
        let seen = own
            .chain(table)
            .chain(piles)
            .chain(discarded)
            .filter(|c| c.rank == rank)
            .count() as u32;
        4u32.saturating_sub(seen)
    }

    fn risk(engine: &Engine, player_id: PlayerId, card: Card) -> u32 {
        let neighbours = engine
            .table()
            .iter()
            .filter(|c| c.rank.is_adjacent(card.rank))
            .count() as u32;
        Self::bonus_exposure(card.rank) + neighbours + Self::unseen(engine, player_id, card.rank)
    }

    fn safest_drop(engine: &Engine, player_id: PlayerId, hand: &[Card]) -> Option<Card> {
        hand.iter()
            .copied()
            .min_by_key(|&card| Self::risk(engine, player_id, card))
    }
}

impl Default for BaselineAI {
    fn default() -> Self {
        Self::new()
    }
}

impl AIOpponent for BaselineAI {
    fn choose_card(&self, engine: &Engine, player_id: PlayerId) -> Option<Card> {
        let hand = engine.player(player_id)?.hand();
        Self::best_capture(engine, player_id, hand)
            .or_else(|| Self::safest_drop(engine, player_id, hand))
    }

    fn name(&self) -> &str {
        "BaselineAI"
    }
}
