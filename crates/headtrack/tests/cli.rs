use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const CONFIG: &str = r#"{
    "identifier": {
        "epsilon": 5.0,
        "patterns": [ { "edges_sq": [10000.0, 10000.0, 20000.0] } ]
    },
    "covariance": { "window": 3, "initial_variance": 4.0 }
}"#;

const FRAMES: &str = r#"[
    [[0, 0, 0], [100, 0, 0], [0, 100, 0], [900, 900, 900]],
    [[900, 900, 900], [0, 101, 0], [1, 1, 0], [101, 1, 0]],
    [[5000, 0, 0]]
]"#;

#[test]
fn writes_one_report_per_frame() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("config.json");
    let frames = dir.path().join("frames.json");
    let output = dir.path().join("out.json");
    fs::write(&config, CONFIG).expect("write config");
    fs::write(&frames, FRAMES).expect("write frames");

    Command::cargo_bin("headtrack")
        .expect("binary")
        .arg("--config")
        .arg(&config)
        .arg("--frames")
        .arg(&frames)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let reports: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("read output")).expect("json");
    let reports = reports.as_array().expect("array");
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["heads"][0]["selected"], 0);
    assert_eq!(reports[1]["heads"][0]["triples"][0]["i"], 2);
    assert!(reports[2]["heads"][0]["selected"].is_null());
    assert_eq!(reports[2]["heads"][0]["window_len"], 2);
}

#[test]
fn prints_to_stdout_without_output_path() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("config.json");
    let frames = dir.path().join("frames.json");
    fs::write(&config, CONFIG).expect("write config");
    fs::write(&frames, FRAMES).expect("write frames");

    Command::cargo_bin("headtrack")
        .expect("binary")
        .args(["--dedup", "0.5", "--config"])
        .arg(&config)
        .arg("--frames")
        .arg(&frames)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"num_points\": 4"));
}

#[test]
fn invalid_config_fails() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("config.json");
    let frames = dir.path().join("frames.json");
    fs::write(&config, r#"{ "identifier": { "patterns": [] } }"#).expect("write config");
    fs::write(&frames, FRAMES).expect("write frames");

    Command::cargo_bin("headtrack")
        .expect("binary")
        .arg("--config")
        .arg(&config)
        .arg("--frames")
        .arg(&frames)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one reference pattern"));
}

#[test]
fn log_level_is_honoured() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("config.json");
    let frames = dir.path().join("frames.json");
    let output = dir.path().join("out.json");
    fs::write(&config, CONFIG).expect("write config");
    fs::write(&frames, FRAMES).expect("write frames");

    Command::cargo_bin("headtrack")
        .expect("binary")
        .args(["--log-level", "info", "--config"])
        .arg(&config)
        .arg("--frames")
        .arg(&frames)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("head tracker ready"));
}

#[test]
fn unknown_log_level_fails() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("config.json");
    let frames = dir.path().join("frames.json");
    fs::write(&config, CONFIG).expect("write config");
    fs::write(&frames, FRAMES).expect("write frames");

    Command::cargo_bin("headtrack")
        .expect("binary")
        .args(["--log-level", "loud", "--config"])
        .arg(&config)
        .arg("--frames")
        .arg(&frames)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --log-level"));
}

#[test]
fn negative_dedup_tolerance_fails() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("config.json");
    let frames = dir.path().join("frames.json");
    fs::write(&config, CONFIG).expect("write config");
    fs::write(&frames, FRAMES).expect("write frames");

    Command::cargo_bin("headtrack")
        .expect("binary")
        .args(["--dedup", "-1", "--config"])
        .arg(&config)
        .arg("--frames")
        .arg(&frames)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate tolerance must be finite"));
}
