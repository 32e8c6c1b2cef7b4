//! # ronda-engine: Ronda Game Engine Core
//!
//! A deterministic rule engine for Ronda, the two-player capture game played
//! with the 40-card Spanish deck. Provides the deck and deal state machine,
//! capture resolution with sequence extension, scoring, per-turn timing and
//! round logging, with a seeded RNG so that a host and a remote participant
//! agree on every outcome.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and the integer card code
//! - [`deck`] - Deterministic deck shuffling with ChaCha20 RNG
//! - [`table`] - Face-up cards available for capture
//! - [`player`] - Hand, captured pile and score of each player
//! - [`rules`] - Capture resolution, table validity, scoring and rule settings
//! - [`hand`] - Ronda and Tringa detection on dealt hands
//! - [`round`] - Round and deal state machine
//! - [`turn`] - Per-turn countdown with warning and timeout
//! - [`engine`] - Game orchestration over successive rounds
//! - [`events`] - Outbound events and inbound intents
//! - [`mirror`] - Serializable snapshots and validated remote copies
//! - [`logger`] - RoundRecord serialization to JSONL
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use ronda_engine::engine::Engine;
//! use ronda_engine::rules::RuleSet;
//!
//! let mut engine = Engine::new(Some(42), RuleSet::default());
//! engine.start().expect("opening deal");
//!
//! for event in engine.drain_events() {
//!     println!("{:?}", event);
//! }
//! ```
//!
//! ## Capture Resolution
//!
//! A played card takes every table card of its rank plus the runs extending
//! from them. Ranks 8 and 9 do not exist, so 7 and 10 are not adjacent:
//!
//! ```rust
//! use ronda_engine::cards::{Card, Rank, Suit};
//! use ronda_engine::rules::{capture_set, score_capture, ScoringPolicy};
//!
//! let table = [
//!     Card::new(Suit::Oros, Rank::Six),
//!     Card::new(Suit::Copas, Rank::Seven),
//!     Card::new(Suit::Espadas, Rank::Ten),
//! ];
//! let captured = capture_set(Card::new(Suit::Bastos, Rank::Six), &table);
//! assert_eq!(captured.len(), 2);
//!
//! let score = score_capture(&captured, ScoringPolicy::CardCount, false);
//! assert_eq!(score.total(), 2);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! ```rust
//! use ronda_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(7);
//! let mut b = Deck::new_with_seed(7);
//! a.shuffle();
//! b.shuffle();
//! assert_eq!(a.codes(), b.codes());
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod hand;
pub mod logger;
pub mod mirror;
pub mod player;
pub mod round;
pub mod rules;
pub mod table;
pub mod turn;
