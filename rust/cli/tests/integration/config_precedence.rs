use crate::helpers::cli_runner::CliRunner;
use serde_json::Value;
use serial_test::serial;

fn cfg_json(cli: &CliRunner, env: &[(&str, &str)]) -> Value {
    let res = cli.run_with_env(&["cfg"], env);
    assert_eq!(res.exit_code, 0, "cfg failed: {}", res.stderr);
    serde_json::from_str(&res.stdout).expect("cfg prints JSON")
}

#[test]
#[serial]
fn i1_cfg_shows_defaults() {
    let cli = CliRunner::new().expect("init");
    let json = cfg_json(&cli, &[]);

    assert_eq!(json["target_score"]["value"].as_u64(), Some(41));
    assert_eq!(json["target_score"]["source"].as_str(), Some("default"));
    assert_eq!(json["scoring"]["value"].as_str(), Some("card_count"));
    assert_eq!(json["ai"]["value"].as_str(), Some("baseline"));
    assert!(json["seed"]["value"].is_null());
}

#[test]
#[serial]
fn i2_env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("ronda.toml");
    std::fs::write(
        &cfg_path,
        "seed = 456\ntarget_score = 61\nscoring = \"match_plus_run\"\nai = \"random\"\n",
    )
    .unwrap();
    let cfg_path = cfg_path.to_string_lossy().into_owned();
    let cli = CliRunner::new().expect("init");

    let json = cfg_json(&cli, &[("RONDA_CONFIG", &cfg_path)]);
    assert_eq!(json["seed"]["value"].as_u64(), Some(456));
    assert_eq!(json["seed"]["source"].as_str(), Some("file"));
    assert_eq!(json["scoring"]["value"].as_str(), Some("match_plus_run"));
    assert_eq!(json["ai"]["source"].as_str(), Some("file"));

    let json = cfg_json(
        &cli,
        &[
            ("RONDA_CONFIG", &cfg_path),
            ("RONDA_SEED", "123"),
            ("RONDA_AI", "baseline"),
        ],
    );
    assert_eq!(json["seed"]["value"].as_u64(), Some(123));
    assert_eq!(json["seed"]["source"].as_str(), Some("env"));
    assert_eq!(json["ai"]["value"].as_str(), Some("baseline"));
    assert_eq!(json["target_score"]["source"].as_str(), Some("file"));
}

#[test]
#[serial]
fn i3_invalid_config_fails() {
    let cli = CliRunner::new().expect("init");
    let res = cli.run_with_env(&["cfg"], &[("RONDA_AI", "oracle")]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Invalid configuration"));
}

#[test]
#[serial]
fn i4_flag_target_wins_over_env() {
    let cli = CliRunner::new().expect("init");
    let res = cli.run_with_env(
        &["play", "--vs", "ai", "--seed", "5", "--target", "11"],
        &[("RONDA_TARGET_SCORE", "99")],
    );
    assert_eq!(res.exit_code, 0, "stderr: {}", res.stderr);
    assert!(res.stdout.contains("target=11"));
}
