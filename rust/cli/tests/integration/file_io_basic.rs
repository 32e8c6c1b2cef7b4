use crate::helpers::cli_runner::CliRunner;
use serial_test::serial;

#[test]
#[serial]
fn c1_replay_requires_input_arg() {
    let cli = CliRunner::new().expect("CliRunner init");
    let res = cli.run(&["replay"]);
    assert_eq!(res.exit_code, 2);
    assert!(
        res.stderr.to_lowercase().contains("required"),
        "stderr should mention the missing argument: {}",
        res.stderr
    );
}

#[test]
#[serial]
fn c2_missing_files_are_errors() {
    let cli = CliRunner::new().expect("CliRunner init");
    for cmd in ["replay", "stats", "verify"] {
        let res = cli.run(&[cmd, "--input", "/nonexistent/rounds.jsonl"]);
        assert_eq!(res.exit_code, 2, "{} should fail", cmd);
        assert!(res.stderr.contains("Error"), "{}: {}", cmd, res.stderr);
    }
}

#[test]
#[serial]
fn c3_empty_history_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.jsonl");
    std::fs::write(&path, "").unwrap();
    let p = path.to_string_lossy().into_owned();
    let cli = CliRunner::new().expect("CliRunner init");

    let replay = cli.run(&["replay", "--input", &p]);
    assert_eq!(replay.exit_code, 0);
    assert!(replay.stdout.contains("No rounds found"));

    let verify = cli.run(&["verify", "--input", &p]);
    assert_eq!(verify.exit_code, 0);
    assert!(verify.stdout.contains("Verify: OK (rounds=0)"));
}

#[test]
#[serial]
fn c4_sim_rejects_zero_games() {
    let cli = CliRunner::new().expect("CliRunner init");
    let res = cli.run(&["sim", "--games", "0"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("games must be >= 1"));
}
