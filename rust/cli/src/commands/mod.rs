//! Command handler modules for the Ronda CLI.
//!
//! Each subcommand lives in its own module and exposes
//! `handle_COMMAND_command(...) -> Result<(), CliError>`. Output streams are
//! passed in as `&mut dyn Write` so tests can capture them.

mod cfg;
mod deal;
mod play;
mod replay;
mod sim;
mod stats;
mod verify;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use play::handle_play_command;
pub use replay::handle_replay_command;
pub use sim::handle_sim_command;
pub use stats::handle_stats_command;
pub use verify::handle_verify_command;

use crate::error::CliError;
use ronda_ai::{AIOpponent, create_ai};
use ronda_engine::engine::Engine;
use ronda_engine::events::GameEvent;
use ronda_engine::round::RoundPhase;

/// Upper bound on plays and deals in one game before giving up.
const MAX_GAME_STEPS: usize = 100_000;

pub(crate) fn build_ai(name: &str, seed: u64) -> Result<Box<dyn AIOpponent>, CliError> {
    create_ai(name, seed).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "unknown AI '{}' (expected one of {})",
            name,
            ronda_ai::AI_TYPES.join(", ")
        ))
    })
}

/// Plays `engine` to the end with one computer player per seat, handing
/// each batch of events to `on_events`. Starts the game if needed.
pub(crate) fn play_out_game(
    engine: &mut Engine,
    seats: [&dyn AIOpponent; 2],
    mut on_events: impl FnMut(Vec<GameEvent>) -> Result<(), CliError>,
) -> Result<(), CliError> {
    if engine.phase() == RoundPhase::NotStarted {
        engine.start()?;
    }
    for _ in 0..MAX_GAME_STEPS {
        on_events(engine.drain_events())?;
        if engine.is_game_over() {
            return Ok(());
        }
        if engine.needs_deal() {
            engine.request_deal()?;
            continue;
        }
        let player = engine.current_player();
        let card = seats[player]
            .choose_card(engine, player)
            .ok_or_else(|| CliError::Engine(format!("player {} has no card to play", player)))?;
        engine.play_card(player, card.code())?;
    }
    Err(CliError::Engine(format!(
        "game did not finish within {} steps",
        MAX_GAME_STEPS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_engine::rules::RuleSet;

    #[test]
    fn ai_game_reaches_a_winner() {
        let rules = RuleSet {
            target_score: 15,
            ..RuleSet::default()
        };
        let mut engine = Engine::new(Some(3), rules);
        let a = build_ai("baseline", 1).unwrap();
        let b = build_ai("random", 2).unwrap();
        let mut rounds_ended = 0;
        play_out_game(&mut engine, [a.as_ref(), b.as_ref()], |events| {
            rounds_ended += events
                .iter()
                .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
                .count();
            Ok(())
        })
        .unwrap();
        assert!(engine.is_game_over());
        assert!(rounds_ended >= 1);
        assert!(engine.scores().iter().any(|&s| s >= 15));
    }

    #[test]
    fn unknown_ai_is_invalid_input() {
        assert!(matches!(
            build_ai("oracle", 0),
            Err(CliError::InvalidInput(_))
        ));
    }
}
