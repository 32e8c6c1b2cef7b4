//! Deal command handler.
//!
//! Starts a game and prints the accepted opening table, both hands, any
//! announced combinations and how many cards stay in the deck. The same
//! seed always prints the same deal.

use crate::error::CliError;
use crate::formatters::{format_cards, format_event};
use ronda_engine::engine::Engine;
use ronda_engine::events::GameEvent;
use ronda_engine::rules::RuleSet;
use std::io::Write;

pub fn handle_deal_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let base_seed = seed.unwrap_or_else(rand::random);
    let mut eng = Engine::new(Some(base_seed), RuleSet::default());
    eng.start()?;

    writeln!(out, "Seed: {}", base_seed)?;
    writeln!(out, "Table: {}", format_cards(eng.table()))?;
    for player in eng.players() {
        writeln!(out, "Hand P{}: {}", player.id(), format_cards(player.hand()))?;
    }
    for event in eng.drain_events() {
        if let GameEvent::CombinationAnnounced { .. } = event
            && let Some(line) = format_event(&event, &["P0", "P1"])
        {
            writeln!(out, "{}", line)?;
        }
    }
    writeln!(out, "First to play: P{}", eng.current_player())?;
    writeln!(out, "Deck: {} cards", eng.deck_remaining())?;
    Ok(())
}
