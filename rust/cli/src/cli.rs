//! Command-line grammar.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ronda", version, about = "Ronda card game engine CLI")]
pub struct RondaCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play games against the baseline AI, or watch two AIs play
    Play {
        #[arg(long, value_enum)]
        vs: Vs,
        #[arg(long)]
        games: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        target: Option<u32>,
    },
    /// Play complete AI games and append round records as JSONL
    Sim {
        #[arg(long)]
        games: u32,
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        ai_a: Option<String>,
        #[arg(long)]
        ai_b: Option<String>,
        #[arg(long)]
        target: Option<u32>,
    },
    /// Print the opening table and both hands of a new game
    Deal {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the plays of recorded rounds
    Replay {
        #[arg(long)]
        input: String,
    },
    /// Aggregate rounds, game wins and average points
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Check recorded rounds against the rules
    Verify {
        #[arg(long)]
        input: Option<String>,
    },
    /// Show the resolved configuration
    Cfg,
}

/// Opponent type for the `play` command.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Vs {
    /// You against the configured AI (cards typed on stdin).
    Human,
    /// The configured AI against itself.
    Ai,
}

impl Vs {
    /// ```
    /// # use ronda_cli::cli::Vs;
    /// assert_eq!(Vs::Ai.as_str(), "ai");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Vs::Human => "human",
            Vs::Ai => "ai",
        }
    }
}
