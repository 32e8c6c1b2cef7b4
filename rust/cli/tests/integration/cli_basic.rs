use crate::helpers::cli_runner::CliRunner;
use serial_test::serial;

#[test]
#[serial]
fn a1_help_lists_all_commands() {
    let cli = CliRunner::new().expect("CliRunner should initialize");
    let res = cli.run(&["--help"]);

    assert_eq!(res.exit_code, 0, "--help should exit with code 0");
    for cmd in ["play", "sim", "deal", "replay", "stats", "verify", "cfg"] {
        assert!(res.stdout.contains(cmd), "help should list `{}`", cmd);
    }
}

#[test]
#[serial]
fn a2_version_prints_version_and_exits_zero() {
    let cli = CliRunner::new().expect("CliRunner should initialize");
    let res = cli.run(&["--version"]);
    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.contains("ronda"));
}

#[test]
#[serial]
fn a3_unknown_subcommand_shows_commands_on_stderr() {
    let cli = CliRunner::new().expect("CliRunner should initialize");
    let res = cli.run(&["shuffle"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Commands:"), "stderr: {}", res.stderr);
    assert!(res.stderr.contains("  verify"));
}

#[test]
#[serial]
fn a4_deal_is_reproducible_for_a_seed() {
    let cli = CliRunner::new().expect("CliRunner should initialize");
    let a = cli.run(&["deal", "--seed", "2024"]);
    let b = cli.run(&["deal", "--seed", "2024"]);
    assert_eq!(a.exit_code, 0);
    assert_eq!(a.stdout, b.stdout);
    assert!(a.stdout.contains("Deck: 30 cards"));
}

#[test]
#[serial]
fn a5_play_human_quits_on_piped_q() {
    let cli = CliRunner::new().expect("CliRunner should initialize");
    let res = cli.run_with_input(&["play", "--vs", "human", "--seed", "3"], "q\n");
    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("Games played: 0"));
}
