use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures/sample_campus.json")
        .canonicalize()
        .expect("fixture snapshot present")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("campusnav-cli");
    cmd.env("RUST_LOG", "error").env_remove("CAMPUSNAV_SNAPSHOT");
    cmd
}

fn prepare_command() -> Command {
    let mut cmd = cli();
    cmd.arg("--snapshot").arg(fixture_path());
    cmd
}

#[test]
fn text_route_lists_floors_and_instructions() {
    let mut cmd = prepare_command();
    cmd.args(["route", "--from", "101", "--to", "201"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Route weight 68.00 across 2 floor group(s):",
        ))
        .stdout(predicate::str::contains("Floor 2:"))
        .stdout(predicate::str::contains(
            "1. go up via phantom_stair_30_end to floor 2",
        ));
}

#[test]
fn json_route_is_machine_readable() {
    let mut cmd = prepare_command();
    cmd.args([
        "route",
        "--from",
        "room_101",
        "--to",
        "room_102",
        "--algorithm",
        "dijkstra",
        "--format",
        "json",
    ]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(value["weight"], serde_json::json!(28.0));
    assert_eq!(value["path"][0]["points"][0]["vertex"], "room_101");
    assert!(value["instructions"].as_array().is_some_and(|lines| !lines.is_empty()));
}

#[test]
fn unreachable_room_exits_with_code_two() {
    let mut cmd = prepare_command();
    cmd.args(["route", "--from", "101", "--to", "999", "--format", "json"]);

    cmd.assert()
        .code(2)
        .stdout(predicate::str::contains("\"path\": []"))
        .stderr(predicate::str::contains(
            "no route found between room_101 and room_999",
        ));
}

#[test]
fn unknown_algorithm_is_rejected() {
    let mut cmd = prepare_command();
    cmd.args(["route", "--from", "101", "--to", "102", "--algorithm", "bfs"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown algorithm 'bfs'"));
}

#[test]
fn snapshot_can_come_from_environment() {
    let mut cmd = cli();
    cmd.env("CAMPUSNAV_SNAPSHOT", fixture_path())
        .args(["route", "--from", "101", "--to", "150"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("exit building via outdoor_1_end"))
        .stdout(predicate::str::contains("enter building via outdoor_2_end"));
}

#[test]
fn missing_snapshot_is_reported() {
    let temp_dir = tempdir().expect("create temp dir");
    let mut cmd = cli();
    cmd.arg("--snapshot")
        .arg(temp_dir.path().join("absent.json"))
        .args(["route", "--from", "1", "--to", "2"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load snapshot"));
}

#[test]
fn no_snapshot_at_all_is_reported() {
    let mut cmd = cli();
    cmd.args(["inspect"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("CAMPUSNAV_SNAPSHOT"));
}

#[test]
fn invalid_snapshot_input_fails() {
    let temp_dir = tempdir().expect("create temp dir");
    let path = temp_dir.path().join("orphans.json");
    fs::write(
        &path,
        r#"{ "connections": { "1": { "room_id": 1, "to_segment_id": 2 } } }"#,
    )
    .expect("write snapshot");

    let mut cmd = cli();
    cmd.arg("--snapshot")
        .arg(&path)
        .args(["route", "--from", "1", "--to", "2"]);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("invalid input"));
}

#[test]
fn inspect_reports_graph_counts() {
    let mut cmd = prepare_command();
    cmd.args(["inspect", "--format", "json"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(value["rooms"], 5);
    assert_eq!(value["segments"], 5);
    assert_eq!(value["connections"], 9);
    assert!(value["phantom_vertices"].as_u64().is_some_and(|count| count > 0));
}
