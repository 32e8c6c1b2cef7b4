//! Shared helpers for the integration tests.
//!
//! - [`cli_runner::CliRunner`] runs the `ronda` binary (or [`ronda_cli::run`]
//!   when the binary is not built) and captures exit code, stdout and stderr.
//! - [`sim_file`] writes a simulated history into a temp directory.

pub mod cli_runner;

use cli_runner::CliRunner;
use std::path::PathBuf;

/// Environment variables read by the configuration loader.
pub const CONFIG_VARS: &[&str] = &[
    "RONDA_CONFIG",
    "RONDA_SEED",
    "RONDA_TARGET_SCORE",
    "RONDA_SCORING",
    "RONDA_AI",
];

/// Simulates `games` games with `seed` into `<dir>/sim.jsonl`.
pub fn sim_file(cli: &CliRunner, dir: &tempfile::TempDir, games: u32, seed: u64) -> PathBuf {
    let path = dir.path().join("sim.jsonl");
    let res = cli.run(&[
        "sim",
        "--games",
        &games.to_string(),
        "--seed",
        &seed.to_string(),
        "--target",
        "21",
        "--output",
        path.to_string_lossy().as_ref(),
    ]);
    assert_eq!(res.exit_code, 0, "sim failed: {}", res.stderr);
    path
}
