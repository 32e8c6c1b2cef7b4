//! # Play Command
//!
//! Interactive Ronda against the configured AI, or two AIs against each
//! other.
//!
//! - **Human vs AI**: you are P0 and type a card each turn, either as its
//!   code (`305`) or in short form (`5B`); `q` quits.
//! - **AI vs AI**: both seats use the configured AI and every event is
//!   printed.
//!
//! Games run until a player reaches the target score. Re-deals happen as
//! soon as the engine asks for them.

use crate::cli::Vs;
use crate::config;
use crate::error::CliError;
use crate::formatters::{format_cards, format_event, format_hand};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{ParseResult, parse_card_input};
use ronda_ai::AIOpponent;
use ronda_engine::engine::Engine;
use ronda_engine::events::GameEvent;
use ronda_engine::player::PlayerId;
use ronda_engine::rules::RuleSet;
use std::io::{BufRead, Write};

use super::{build_ai, play_out_game};

const HUMAN: PlayerId = 0;

/// Handle the play command.
///
/// `games` defaults to 1, `seed` to the configured seed or a random one, and
/// `target` to the configured target score.
///
/// # Errors
///
/// `CliError::InvalidInput` when `games` is 0, `CliError::Config` for a bad
/// configuration, engine and I/O errors otherwise.
pub fn handle_play_command(
    vs: Vs,
    games: Option<u32>,
    seed: Option<u64>,
    target: Option<u32>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let games = games.unwrap_or(1);
    if games == 0 {
        ui::write_error(err, "games must be >= 1")?;
        return Err(CliError::InvalidInput("games must be >= 1".to_string()));
    }
    let cfg = config::load().map_err(|e| CliError::Config(e.to_string()))?;
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let rules = cfg.rules(target);

    writeln!(
        out,
        "play: vs={} games={} seed={} target={}",
        vs.as_str(),
        games,
        seed,
        rules.target_score
    )?;

    let mut played = 0u32;
    for game in 1..=games {
        let game_seed = seed.wrapping_add(u64::from(game - 1));
        writeln!(out, "Game {}", game)?;
        let finished = match vs {
            Vs::Ai => {
                play_ai_vs_ai(game_seed, rules.clone(), &cfg.ai, out)?;
                true
            }
            Vs::Human => play_human_vs_ai(game_seed, rules.clone(), &cfg.ai, out, err, stdin)?,
        };
        if !finished {
            break;
        }
        played += 1;
    }

    writeln!(out, "Games played: {}", played)?;
    Ok(())
}

fn play_ai_vs_ai(
    seed: u64,
    rules: RuleSet,
    ai_name: &str,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let a = build_ai(ai_name, seed)?;
    let b = build_ai(ai_name, seed.wrapping_add(1))?;
    let mut engine = Engine::new(Some(seed), rules);
    let names = ["P0", "P1"];
    play_out_game(&mut engine, [a.as_ref(), b.as_ref()], |events| {
        print_events(&events, &names, None, out)
    })
}

/// Returns `Ok(false)` when the player quit or input ran out.
fn play_human_vs_ai(
    seed: u64,
    rules: RuleSet,
    ai_name: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<bool, CliError> {
    let ai: Box<dyn AIOpponent> = build_ai(ai_name, seed)?;
    let mut engine = Engine::new(Some(seed), rules);
    engine.start()?;
    let names = ["P0", "P1"];
    writeln!(out, "You are P0, {} is P1", ai.name())?;

    loop {
        print_events(&engine.drain_events(), &names, Some(HUMAN), out)?;
        if engine.is_game_over() {
            return Ok(true);
        }
        if engine.needs_deal() {
            engine.request_deal()?;
            continue;
        }

        let current = engine.current_player();
        if current != HUMAN {
            let card = ai.choose_card(&engine, current).ok_or_else(|| {
                CliError::Engine(format!("{} has no card to play", ai.name()))
            })?;
            engine.play_card(current, card.code())?;
            continue;
        }

        writeln!(out, "Table: {}", format_cards(engine.table()))?;
        writeln!(out, "Hand: {}", format_hand(engine.players()[HUMAN].hand()))?;
        write!(out, "Enter card (code or short form, q to quit): ")?;
        out.flush()?;

        let Some(input) = read_stdin_line(stdin) else {
            return Ok(false);
        };
        match parse_card_input(&input) {
            ParseResult::Card(card) => {
                if let Err(e) = engine.play_card(HUMAN, card.code()) {
                    ui::write_error(err, &format!("Invalid play: {}", e))?;
                }
            }
            ParseResult::Quit => return Ok(false),
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }
}

/// Prints `events`, hiding the cards dealt to the seat opposite `viewer`.
fn print_events(
    events: &[GameEvent],
    names: &[&str; 2],
    viewer: Option<PlayerId>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    for event in events {
        if let (GameEvent::HandDealt { player_id, cards }, Some(v)) = (event, viewer)
            && *player_id != v
        {
            writeln!(out, "{} dealt {} cards", names[*player_id], cards.len())?;
            continue;
        }
        if let Some(line) = format_event(event, names) {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}
