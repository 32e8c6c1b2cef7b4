//! Simulation command handler.
//!
//! Plays complete AI games and appends every finished round to a JSONL file
//! through [`RoundLogger`]. Game seeds are drawn from a ChaCha20 stream
//! seeded with the base seed, so a run is reproducible from its seed alone.
//! Appending to an existing file continues its round id numbering.

use crate::config;
use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::ui;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use ronda_engine::engine::Engine;
use ronda_engine::logger::{last_round_seq, RoundLogger};
use std::io::Write;
use std::path::Path;

use super::{build_ai, play_out_game};

/// Handle the sim command.
///
/// `ai_a` sits at P0 and `ai_b` at P1; both default to the configured AI.
/// Without `output` the games are played and only summarized.
#[allow(clippy::too_many_arguments)]
pub fn handle_sim_command(
    games: u32,
    output: Option<String>,
    seed: Option<u64>,
    ai_a: Option<String>,
    ai_b: Option<String>,
    target: Option<u32>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if games == 0 {
        ui::write_error(err, "games must be >= 1")?;
        return Err(CliError::InvalidInput("games must be >= 1".to_string()));
    }
    let cfg = config::load().map_err(|e| CliError::Config(e.to_string()))?;
    let base_seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let rules = cfg.rules(target);
    let ai_a = ai_a.unwrap_or_else(|| cfg.ai.clone());
    let ai_b = ai_b.unwrap_or_else(|| cfg.ai.clone());
    // fail on a bad name before any file is touched
    build_ai(&ai_a, 0)?;
    build_ai(&ai_b, 0)?;

    let mut logger = match output.as_deref() {
        Some(p) => Some(open_logger(Path::new(p), err)?),
        None => None,
    };

    let mut seeds = ChaCha20Rng::seed_from_u64(base_seed);
    let mut wins = [0u32; 2];
    let mut rounds = 0usize;
    for game in 1..=games {
        let game_seed: u64 = seeds.random();
        let a = build_ai(&ai_a, game_seed)?;
        let b = build_ai(&ai_b, game_seed.wrapping_add(1))?;
        let mut engine = Engine::new(Some(game_seed), rules.clone());
        play_out_game(&mut engine, [a.as_ref(), b.as_ref()], |_| Ok(()))?;

        if let Some(w) = engine.winner() {
            wins[w] += 1;
        }
        for mut record in engine.take_round_records() {
            rounds += 1;
            if let Some(logger) = logger.as_mut() {
                record.round_id = logger.next_id();
                record.meta = Some(serde_json::json!({
                    "game": game,
                    "ai": [ai_a, ai_b],
                }));
                if let Err(e) = logger.write(&record) {
                    ui::write_error(err, "Failed to write round to file")?;
                    return Err(CliError::Io(e));
                }
            }
        }
    }

    writeln!(
        out,
        "Simulated: {} games ({} rounds) seed={}",
        games, rounds, base_seed
    )?;
    writeln!(out, "Wins: P0={} P1={}", wins[0], wins[1])?;
    Ok(())
}

fn open_logger(path: &Path, err: &mut dyn Write) -> Result<RoundLogger, CliError> {
    if let Err(e) = ensure_parent_dir(path) {
        ui::write_error(err, &e)?;
        return Err(CliError::Io(std::io::Error::other(e)));
    }
    let mut logger = match RoundLogger::append(path) {
        Ok(l) => l,
        Err(e) => {
            ui::write_error(err, &format!("Failed to open {}: {}", path.display(), e))?;
            return Err(CliError::Io(e));
        }
    };
    let existing = std::fs::read_to_string(path).unwrap_or_default();
    let last = last_round_seq(&existing, logger.date());
    logger.resume_after(last);
    Ok(logger)
}
