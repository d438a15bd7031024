//! Integration tests for the hb-cli commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a 3x3x3 terrain with a rock floor and air above.
fn floor_terrain(dir: &TempDir) -> PathBuf {
    let codes: Vec<Vec<Vec<i32>>> = (0..3)
        .map(|_| (0..3).map(|_| vec![1, 0, 0]).collect())
        .collect();
    let path = dir.path().join("floor.json");
    fs::write(&path, serde_json::to_string(&codes).unwrap()).unwrap();
    path
}

fn hb() -> Command {
    Command::cargo_bin("hb").unwrap()
}

// ---------------------------------------------------------------------------
// terrain
// ---------------------------------------------------------------------------

#[test]
fn terrain_summarizes_demo() {
    hb().arg("terrain")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("demo terrain")
                .and(predicate::str::contains("Size: 16 x 16 x 8"))
                .and(predicate::str::contains("workshop")),
        );
}

#[test]
fn terrain_reports_file_counts_as_json() {
    let dir = TempDir::new().unwrap();
    let path = floor_terrain(&dir);
    let output = hb()
        .args(["terrain", "--terrain", path.to_str().unwrap(), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["size"], serde_json::json!([3, 3, 3]));
    assert_eq!(report["cubes"]["rock"], 9);
    assert_eq!(report["cubes"]["air"], 18);
    assert_eq!(report["connected"], 9);
    assert_eq!(report["valid_positions"], 9);
}

#[test]
fn terrain_rejects_ragged_array() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ragged.json");
    fs::write(&path, "[[[1, 0], [1]], [[1, 0], [1, 0]]]").unwrap();
    hb().args(["terrain", "--terrain", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid terrain"));
}

#[test]
fn terrain_rejects_unknown_codes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "[[[1, 7]]]").unwrap();
    hb().args(["terrain", "--terrain", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid terrain"));
}

#[test]
fn terrain_rejects_non_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "rock rock rock").unwrap();
    hb().args(["terrain", "--terrain", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a terrain array"));
}

#[test]
fn terrain_missing_file() {
    hb().args(["terrain", "--terrain", "/nonexistent/terrain.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_prints_status_table() {
    hb().args(["simulate", "--ticks", "50", "--units", "4"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Simulation")
                .and(predicate::str::contains("units alive"))
                .and(predicate::str::contains("Unit Status")),
        );
}

#[test]
fn simulate_verbose_shows_event_log() {
    hb().args(["simulate", "--ticks", "5", "--units", "2", "--verbose"])
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(predicate::str::contains("Event Log").and(predicate::str::contains("joined")));
}

#[test]
fn simulate_json_report() {
    let dir = TempDir::new().unwrap();
    let path = floor_terrain(&dir);
    let output = hb()
        .args([
            "simulate",
            "--terrain",
            path.to_str().unwrap(),
            "--ticks",
            "20",
            "--units",
            "3",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["ticks"], 20);
    assert_eq!(report["units"].as_array().unwrap().len(), 3);
    assert_eq!(report["factions"].as_array().unwrap().len(), 3);
}

#[test]
fn simulate_is_deterministic_per_seed() {
    let run = |seed: &str| {
        hb().args(["simulate", "--ticks", "80", "--seed", seed, "--format", "json"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run("7"), run("7"));
}

#[test]
fn simulate_rejects_long_ticks() {
    hb().args(["simulate", "--ticks", "1", "--dt", "0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("simulation error"));
}

#[test]
fn simulate_rejects_overpopulation() {
    hb().args(["simulate", "--ticks", "1", "--units", "101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot spawn unit"));
}
