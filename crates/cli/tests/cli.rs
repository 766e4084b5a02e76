use assert_cmd::Command;
use joint_graph::{Scene, save_scene};
use predicates::prelude::*;
use tempfile::tempdir;

fn joint() -> Command {
    let mut cmd = Command::cargo_bin("joint").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    joint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulate"))
        .stdout(predicate::str::contains("scene"))
        .stdout(predicate::str::contains("settings"));
}

#[test]
fn test_simulate_prints_table() {
    joint()
        .args(["simulate", "--frames", "60", "--every", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Simulating normal wire"))
        .stdout(predicate::str::contains("final offset"));
}

#[test]
fn test_simulate_json() {
    let output = joint()
        .args([
            "simulate",
            "--frames",
            "30",
            "--every",
            "10",
            "--category",
            "self",
            "--jump-frame",
            "5",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["category"], "self");
    assert_eq!(report["samples"].as_array().unwrap().len(), 4);
    assert_eq!(report["samples"][1]["start"]["x"], 200.0);
}

#[test]
fn test_simulate_rejects_negative_delta_time() {
    joint()
        .args(["simulate", "--delta-time=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--delta-time"));
}

#[test]
fn test_scene_replay() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.json");
    save_scene(&Scene::sample().unwrap(), &path).unwrap();

    joint()
        .arg("scene")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample Dialogue"))
        .stdout(predicate::str::contains("links drawn: 4"));
}

#[test]
fn test_scene_json_with_wiggle_settings() {
    let dir = tempdir().unwrap();
    let scene_path = dir.path().join("sample.json");
    let settings_path = dir.path().join("wires.json");
    save_scene(&Scene::sample().unwrap(), &scene_path).unwrap();

    let settings = joint_render::WireSettings::default().with_wiggle_everywhere(true);
    joint_render::save_settings(&settings, &settings_path).unwrap();

    let output = joint()
        .arg("scene")
        .arg(&scene_path)
        .arg("--settings")
        .arg(&settings_path)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["links_drawn"], 4);
    assert_eq!(report["simulators"], 4);
    assert!(report["draw_list"]["elements"].is_array());
}

#[test]
fn test_scene_missing_file() {
    let dir = tempdir().unwrap();
    joint()
        .arg("scene")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load scene"));
}

#[test]
fn test_settings_init_show_validate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wires.toml");

    joint()
        .args(["settings", "init"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default wire settings"));

    joint()
        .args(["settings", "init"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    joint()
        .args(["settings", "show"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("pin_connection_thickness = 5.0"));

    joint()
        .args(["settings", "validate"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_settings_validate_reports_problems() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wires.toml");
    std::fs::write(&path, "not_highlighted_connection_opacity = 1.5\n").unwrap();

    joint()
        .args(["settings", "validate"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("not_highlighted_connection_opacity"))
        .stderr(predicate::str::contains("1 problem(s)"));
}

#[test]
fn test_settings_show_defaults_as_json() {
    let output = joint().args(["settings", "show", "--json"]).output().unwrap();
    assert!(output.status.success());

    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["use_wiggle_wire_for_preview_connection"], true);
    assert_eq!(settings["spline_close_tolerance"], 15.0);
}

#[test]
fn test_settings_unsupported_extension() {
    let dir = tempdir().unwrap();
    joint()
        .args(["settings", "init"])
        .arg(dir.path().join("wires.yaml"))
        .assert()
        .failure();
}
