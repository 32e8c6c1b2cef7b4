//! # Ronda CLI Library
//!
//! Command-line front end for the Ronda engine: play against the AI,
//! simulate AI games into JSONL round histories, and inspect or check those
//! histories afterwards.
//!
//! ## Main Entry Point
//!
//! [`run`] parses the arguments and executes the matching subcommand.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["ronda", "sim", "--games", "10", "--output", "data/sim.jsonl"];
//! let code = ronda_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play against the AI, or watch two AIs
//! - `sim`: Simulate AI games and append round records
//! - `deal`: Show the opening table and hands for a seed
//! - `replay`: Print recorded rounds play by play
//! - `stats`: Aggregate round histories
//! - `verify`: Replay round histories against the rules
//! - `cfg`: Show the resolved configuration

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
mod config;
mod error;
pub mod formatters;
pub mod io_utils;
pub mod ui;
pub mod validation;

use cli::{Commands, RondaCli};
use commands::{
    handle_cfg_command, handle_deal_command, handle_play_command, handle_replay_command,
    handle_sim_command, handle_stats_command, handle_verify_command,
};

pub use error::{CliError, ItemError};

const COMMANDS: &[&str] = &["play", "sim", "deal", "replay", "stats", "verify", "cfg"];

/// Main entry point for the CLI application.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for usage and command errors.
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["ronda", "deal", "--seed", "42"];
/// let code = ronda_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match RondaCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return 2;
                    }
                    0
                }
                _ => {
                    let _ = print_usage(&e, err);
                    2
                }
            };
        }
    };

    let result = match cli.cmd {
        Commands::Play {
            vs,
            games,
            seed,
            target,
        } => {
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(vs, games, seed, target, out, err, &mut stdin_lock)
        }
        Commands::Sim {
            games,
            output,
            seed,
            ai_a,
            ai_b,
            target,
        } => handle_sim_command(games, output, seed, ai_a, ai_b, target, out, err),
        Commands::Deal { seed } => handle_deal_command(seed, out),
        Commands::Replay { input } => handle_replay_command(input, out, err),
        Commands::Stats { input } => handle_stats_command(input, out, err),
        Commands::Verify { input } => {
            let Some(path) = input else {
                let _ = ui::write_error(err, "input required");
                return 2;
            };
            handle_verify_command(path, out, err)
        }
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(err, "Error: {}", e);
            2
        }
    }
}

fn print_usage(e: &clap::Error, err: &mut dyn Write) -> std::io::Result<()> {
    writeln!(err, "{}", e)?;
    writeln!(err)?;
    writeln!(err, "Ronda CLI")?;
    writeln!(err, "Usage: ronda <command> [options]\n")?;
    writeln!(err, "Commands:")?;
    for c in COMMANDS {
        writeln!(err, "  {}", c)?;
    }
    writeln!(err, "\nFor full help, run: ronda --help")
}
