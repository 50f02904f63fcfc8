//! Integration tests for the liftlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Driving a session through stdin
//! - Summary logging and dry runs
//! - Error reporting for bad set indices
//! - CSV rollup of logged sessions

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI command isolated from the user's config
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("liftlog"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"));
    cmd
}

fn wal_lines(data_dir: &Path) -> Vec<Value> {
    let path = data_dir.join("wal/workout_sessions.wal");
    fs::read_to_string(path)
        .expect("Failed to read session log")
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("valid JSON line"))
        .collect()
}

fn write_routine(temp_dir: &TempDir) -> std::path::PathBuf {
    let path = temp_dir.path().join("push.toml");
    fs::write(
        &path,
        r#"
name = "Push Day"

[[exercises]]
name = "Bench Press"
planned_sets = 2
planned_reps = 8
planned_weight = 60.0
position = 0

[[exercises]]
name = "Dip"
planned_sets = 1
planned_reps = 12
position = 1
"#,
    )
    .expect("write routine");
    path
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Live workout session tracker"));
}

#[test]
fn test_plan_lists_flat_sets() {
    let temp_dir = setup_test_dir();
    let routine = write_routine(&temp_dir);

    cli(&temp_dir)
        .arg("plan")
        .arg("--routine")
        .arg(&routine)
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day (3 sets)"))
        .stdout(predicate::str::contains("Bench Press set 2/2: 8 reps @ 60 kg"))
        .stdout(predicate::str::contains("Dip set 1/1: 12 reps"));
}

#[test]
fn test_session_logged_with_completed_sets_only() {
    let temp_dir = setup_test_dir();
    let routine = write_routine(&temp_dir);

    cli(&temp_dir)
        .arg("start")
        .arg("--routine")
        .arg(&routine)
        .arg("--manual-clock")
        .write_stdin("c 0\nt 45\ns 1\nc 2 10\nend\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Duration: 00:45"))
        .stdout(predicate::str::contains("Completed sets: 2"))
        .stdout(predicate::str::contains("Total reps: 18"))
        .stdout(predicate::str::contains("Session logged"))
        .stdout(predicate::str::contains("workout_sessions.wal"));

    let records = wal_lines(&temp_dir.path().join("data"));
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record["routine_name"], "Push Day");
    assert_eq!(record["duration_seconds"], 45);

    let sets = record["sets"].as_array().expect("sets array");
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0]["exercise_name"], "Bench Press");
    assert_eq!(sets[0]["weight_used"], 60.0);
    assert_eq!(sets[1]["exercise_name"], "Dip");
    assert_eq!(sets[1]["reps_completed"], 10);
    assert!(sets[1]["weight_used"].is_null());
}

#[test]
fn test_pause_drops_ticks() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("start")
        .arg("--manual-clock")
        .arg("--dry-run")
        .write_stdin("t 10\np\nt 100\nr\nt 5\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Paused at 00:10"))
        .stdout(predicate::str::contains("Duration: 00:15"));
}

#[test]
fn test_dry_run_does_not_log() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("start")
        .arg("--manual-clock")
        .arg("--dry-run")
        .write_stdin("c 0\nend\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!temp_dir.path().join("data/wal/workout_sessions.wal").exists());
}

#[test]
fn test_eof_ends_session() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("start")
        .arg("--manual-clock")
        .write_stdin("c 0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed sets: 1"));

    assert_eq!(wal_lines(&temp_dir.path().join("data")).len(), 1);
}

#[test]
fn test_bad_commands_reported_and_session_continues() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("start")
        .arg("--manual-clock")
        .arg("--dry-run")
        .write_stdin("c 99\njump\nc\nc 1\nend\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Invalid set index 99"))
        .stderr(predicate::str::contains("unknown command 'jump'"))
        .stderr(predicate::str::contains("missing set index"))
        .stdout(predicate::str::contains("Completed sets: 1"));
}

#[test]
fn test_oversized_tick_is_rejected() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("start")
        .arg("--manual-clock")
        .arg("--dry-run")
        .timeout(std::time::Duration::from_secs(30))
        .write_stdin("t 18446744073709551615\nt 7\nend\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("exceeds the limit"))
        .stdout(predicate::str::contains("Duration: 00:07"));
}

#[test]
fn test_routine_problems_logged_as_warnings() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("odd.json");
    fs::write(
        &path,
        r#"{"name": "Odd", "exercises": [
            {"name": "Curl", "planned_sets": 0, "planned_reps": 10},
            {"name": "Row", "planned_sets": 1, "planned_reps": 8}
        ]}"#,
    )
    .unwrap();

    cli(&temp_dir)
        .arg("plan")
        .arg("--routine")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("WARN"))
        .stderr(predicate::str::contains(
            "Exercise 'Curl' has 0 planned sets and will be left out",
        ))
        .stdout(predicate::str::contains("Odd (1 sets)"));
}

#[test]
fn test_init_config_writes_defaults_once() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config/liftlog/config.toml");

    cli(&temp_dir)
        .arg("init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote config"));

    let contents = fs::read_to_string(&config_path).expect("config written");
    assert!(contents.contains("weight_unit = \"kg\""));

    cli(&temp_dir)
        .arg("init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_default_command_starts_session() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/liftlog");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[session]\nwall_clock = false\nweight_unit = \"lb\"\n",
    )
    .unwrap();

    cli(&temp_dir)
        .write_stdin("c 0\nt 3\nend\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Routine: Full Body"))
        .stdout(predicate::str::contains("Duration: 00:03"))
        .stdout(predicate::str::contains("Volume: 160 lb"));
}

#[test]
fn test_missing_routine_file_fails() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("plan")
        .arg("--routine")
        .arg(temp_dir.path().join("nope.toml"))
        .assert()
        .failure();
}

#[test]
fn test_rollup_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    for _ in 0..2 {
        cli(&temp_dir)
            .arg("start")
            .arg("--manual-clock")
            .write_stdin("c 0\nc 1\nend\n")
            .assert()
            .success();
    }

    cli(&temp_dir)
        .arg("rollup")
        .arg("--cleanup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled up 2 sessions"));

    let csv = fs::read_to_string(data_dir.join("completed_sets.csv")).expect("csv exists");
    // Header plus two sets per session
    assert_eq!(csv.lines().count(), 5);
    assert!(csv.lines().next().unwrap().contains("exercise_name"));
    assert!(!data_dir.join("wal/workout_sessions.wal").exists());
    assert!(!data_dir.join("wal/workout_sessions.wal.processed").exists());
}

#[test]
fn test_rollup_without_log() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("rollup")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to roll up"));
}
