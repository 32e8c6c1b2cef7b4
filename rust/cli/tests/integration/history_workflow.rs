// Simulate, then read the same history back with every consumer command.

use crate::helpers::cli_runner::CliRunner;
use crate::helpers::sim_file;
use ronda_engine::logger::RoundRecord;
use serde_json::Value;
use serial_test::serial;

fn records(path: &std::path::Path) -> Vec<RoundRecord> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid round record"))
        .collect()
}

#[test]
#[serial]
fn w1_simulated_history_verifies_and_aggregates() {
    let cli = CliRunner::new().expect("init");
    let dir = tempfile::tempdir().unwrap();
    let path = sim_file(&cli, &dir, 3, 77);
    let p = path.to_string_lossy().into_owned();
    let rounds = records(&path);
    assert_eq!(rounds.iter().filter(|r| r.winner.is_some()).count(), 3);

    let verify = cli.run(&["verify", "--input", &p]);
    assert_eq!(verify.exit_code, 0, "stderr: {}", verify.stderr);
    assert!(
        verify
            .stdout
            .contains(&format!("Verify: OK (rounds={})", rounds.len()))
    );

    let stats = cli.run(&["stats", "--input", &p]);
    assert_eq!(stats.exit_code, 0, "stderr: {}", stats.stderr);
    let json: Value = serde_json::from_str(&stats.stdout).unwrap();
    assert_eq!(json["rounds"].as_u64(), Some(rounds.len() as u64));
    assert_eq!(json["games"].as_u64(), Some(3));
    assert_eq!(
        json["wins"]["p0"].as_u64().unwrap() + json["wins"]["p1"].as_u64().unwrap(),
        3
    );

    let replay = cli.run(&["replay", "--input", &p]);
    assert_eq!(replay.exit_code, 0);
    assert!(
        replay
            .stdout
            .contains(&format!("Replayed {0} of {0} rounds", rounds.len()))
    );
}

#[test]
#[serial]
fn w2_same_seed_same_history() {
    let cli = CliRunner::new().expect("init");
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let ra = records(&sim_file(&cli, &a, 2, 5));
    let rb = records(&sim_file(&cli, &b, 2, 5));

    assert_eq!(ra.len(), rb.len());
    for (x, y) in ra.iter().zip(&rb) {
        assert_eq!(x.round_id, y.round_id);
        assert_eq!(x.opening_table, y.opening_table);
        assert_eq!(x.plays.len(), y.plays.len());
        assert_eq!(x.scores, y.scores);
    }
}

#[test]
#[serial]
fn w3_verify_catches_edited_scores() {
    let cli = CliRunner::new().expect("init");
    let dir = tempfile::tempdir().unwrap();
    let path = sim_file(&cli, &dir, 1, 8);

    let mut rounds = records(&path);
    rounds[0].scores[1] += 3;
    let body: String = rounds
        .iter()
        .map(|r| serde_json::to_string(r).unwrap() + "\n")
        .collect();
    std::fs::write(&path, body).unwrap();

    let res = cli.run(&["verify", "--input", &path.to_string_lossy()]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stdout.contains("Verify: FAIL"));
    assert!(res.stderr.contains("does not add up"), "{}", res.stderr);
}

#[test]
#[serial]
fn w4_stats_reads_a_directory() {
    let cli = CliRunner::new().expect("init");
    let dir = tempfile::tempdir().unwrap();
    let path = sim_file(&cli, &dir, 1, 9);
    let copy = dir.path().join("nested");
    std::fs::create_dir(&copy).unwrap();
    std::fs::copy(&path, copy.join("again.jsonl")).unwrap();

    let res = cli.run(&["stats", "--input", &dir.path().to_string_lossy()]);
    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    let json: Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(json["rounds"].as_u64(), Some(2 * records(&path).len() as u64));
    assert_eq!(json["games"].as_u64(), Some(2));
}
