//! # ronda-ai: Computer Opponents for Ronda
//!
//! Provides computer players behind a common interface so the CLI and the
//! host can seat them against humans or against each other.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait defining the interface for choosing a card
//! - [`baseline`] - Greedy capture player used for simulations
//! - [`random`] - Seeded uniform player for smoke tests
//! - [`create_ai`] - Factory function for creating AI opponents
//!
//! ## Quick Start
//!
//! ```rust
//! use ronda_ai::create_ai;
//! use ronda_engine::engine::Engine;
//! use ronda_engine::rules::RuleSet;
//!
//! let ai = create_ai("baseline", 0).expect("known AI");
//!
//! let mut engine = Engine::new(Some(42), RuleSet::default());
//! engine.start().expect("opening deal");
//!
//! let player = engine.current_player();
//! let card = ai.choose_card(&engine, player).expect("card in hand");
//! engine.play_card(player, card.code()).expect("legal play");
//! ```

use ronda_engine::cards::Card;
use ronda_engine::engine::Engine;
use ronda_engine::player::PlayerId;

pub mod baseline;
pub mod random;

/// Trait defining the interface for computer opponents.
///
/// # Example Implementation
///
/// ```rust
/// use ronda_ai::AIOpponent;
/// use ronda_engine::cards::Card;
/// use ronda_engine::engine::Engine;
///
/// struct FirstCard;
///
/// impl AIOpponent for FirstCard {
///     fn choose_card(&self, engine: &Engine, player_id: usize) -> Option<Card> {
///         engine.player(player_id)?.hand().first().copied()
///     }
///
///     fn name(&self) -> &str {
///         "FirstCard"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    /// The card `player_id` should play next, or `None` when their hand is
    /// empty.
    fn choose_card(&self, engine: &Engine, player_id: PlayerId) -> Option<Card>;

    fn name(&self) -> &str;
}

/// Names accepted by [`create_ai`].
pub const AI_TYPES: [&str; 2] = ["baseline", "random"];

/// Factory function to create AI opponents by type string. `seed` drives
/// the opponents that make random choices.
///
/// ```rust
/// use ronda_ai::create_ai;
///
/// assert_eq!(create_ai("baseline", 1).map(|ai| ai.name().to_string()).as_deref(), Some("BaselineAI"));
/// assert!(create_ai("oracle", 1).is_none());
/// ```
pub fn create_ai(ai_type: &str, seed: u64) -> Option<Box<dyn AIOpponent>> {
    match ai_type {
        "baseline" => Some(Box::new(baseline::BaselineAI::new())),
        "random" => Some(Box::new(random::RandomAI::new(seed))),
        _ => None,
    }
}
