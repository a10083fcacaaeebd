use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DOCUMENT: &str = r#"
{
  "nodes": [
    {"id": "root", "label": "Root"},
    {"id": "services", "label": "Services", "parent": "root"},
    {"id": "services.core", "label": "core", "parent": "services"},
    {"id": "services.core.billing", "label": "billing", "parent": "services.core"},
    {"id": "services.core.ledger", "label": "ledger", "parent": "services.core"},
    {"id": "utils", "label": "Utils", "parent": "root"},
    {"id": "utils.text", "label": "text", "parent": "utils"},
    {"id": "utils.text.fmt", "label": "fmt", "parent": "utils.text"},
    {"id": "ui", "label": "Ui", "parent": "root"},
    {"id": "ui.views", "label": "views", "parent": "ui"},
    {"id": "ui.views.home", "label": "home", "parent": "ui.views"}
  ],
  "violations": [
    {"id": "v1", "source": "utils.text.fmt", "target": "ui.views.home", "rule": "utils-are-leaves"},
    {"id": "v2", "source": "services.core.billing", "target": "ui.views.home"},
    {"id": "v3", "source": "services.core.ledger", "target": "ui.views.home"},
    {"id": "v4", "source": "services.core.billing", "target": "ui.views.home"},
    {"id": "v5", "source": "services.core.ledger", "target": "ui.views.home"},
    {"id": "v6", "source": "services.core.billing", "target": "ui.views.home"},
    {"id": "v7", "source": "services.core.billing", "target": "missing.node"}
  ],
  "settings": {"layer_depth": 2}
}
"#;

fn write_document(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("violations.json");
    fs::write(&path, body).unwrap();
    path
}

#[allow(deprecated)]
fn archlift(subcommand: &str, input: &Path) -> Command {
    let mut cmd = Command::cargo_bin("archlift").expect("binary");
    cmd.env_remove("ARCHLIFT_LAYER_DEPTH")
        .env_remove("ARCHLIFT_CURRENT_NODE")
        .env_remove("RUST_LOG");
    cmd.arg(subcommand).arg("--input").arg(input);
    cmd
}

fn run_json(mut cmd: Command) -> (bool, Value) {
    let output = cmd.arg("--json").output().expect("command run");
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    (output.status.success(), body)
}

fn setup() -> (TempDir, PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let path = write_document(temp.path(), DOCUMENT);
    (temp, path)
}

#[test]
fn groups_lists_lifted_groups_largest_first() {
    let (_temp, input) = setup();

    // 4 layers, top level, layer depth 2: (4 - 0) - 3 = 1 lifts leaves to the top modules
    let (ok, body) = run_json(archlift("groups", &input));

    assert!(ok, "{body}");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["data"]["lifting_index"], 1);
    let groups = body["data"]["groups"].as_array().unwrap();
    let labels: Vec<_> = groups.iter().map(|g| g["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["Services (High Priority)", "Utils (Low Priority)"]);
    assert_eq!(groups[0]["items"].as_array().unwrap().len(), 5);
    assert_eq!(groups[1]["items"][0]["target"], "ui");
    assert_eq!(groups[1]["items"][0]["rule"], "utils-are-leaves");
}

#[test]
fn groups_respects_layer_depth_from_environment() {
    let (_temp, input) = setup();

    // (4 - 0) - (1 + 1) = 2: every leaf lifts to the root
    let mut cmd = archlift("groups", &input);
    cmd.env("ARCHLIFT_LAYER_DEPTH", "1");
    let (ok, body) = run_json(cmd);

    assert!(ok);
    assert_eq!(body["data"]["lifting_index"], 2);
    let groups = body["data"]["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["label"], "Root (Medium Priority)");
    assert_eq!(groups[0]["items"].as_array().unwrap().len(), 6);
}

#[test]
fn groups_without_lifting_keeps_every_violation() {
    let (_temp, input) = setup();

    let mut cmd = archlift("groups", &input);
    cmd.args(["--layer-depth", "3"]);
    let (ok, body) = run_json(cmd);

    assert!(ok);
    assert_eq!(body["data"]["lifting_index"], 0);
    let total: usize = body["data"]["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["items"].as_array().unwrap().len())
        .sum();
    assert_eq!(total, 7);
}

#[test]
fn groups_reports_engine_stats() {
    let (_temp, input) = setup();

    let (ok, body) = run_json(archlift("groups", &input));

    assert!(ok);
    assert_eq!(body["data"]["stats"]["evaluations"], 1);
    assert_eq!(body["data"]["stats"]["cache_rebuilds"], 1);
}

#[test]
fn huge_layer_depth_shows_raw_violations() {
    let (_temp, input) = setup();

    let mut cmd = archlift("groups", &input);
    cmd.args(["--layer-depth", "9223372036854775807"]);
    let (ok, body) = run_json(cmd);

    assert!(ok, "{body}");
    assert_eq!(body["data"]["lifting_index"], 4 - i64::MAX - 1);
    let total: usize = body["data"]["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["items"].as_array().unwrap().len())
        .sum();
    assert_eq!(total, 7);
}

#[test]
fn deferred_refresh_settles_to_the_same_result() {
    let (_temp, input) = setup();

    let (_, sync_body) = run_json(archlift("groups", &input));

    let mut deferred = archlift("groups", &input);
    deferred.args(["--refresh", "deferred"]);
    let (ok, deferred_body) = run_json(deferred);

    assert!(ok);
    assert_eq!(sync_body["data"]["groups"], deferred_body["data"]["groups"]);
    assert_eq!(deferred_body["data"]["stats"]["evaluations"], 2);
}

#[test]
fn groups_prints_text_table() {
    let (_temp, input) = setup();

    archlift("groups", &input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Reference Architecture violations (2 groups, lifting index 1)",
        ))
        .stdout(predicate::str::contains("5  Services (High Priority)"))
        .stdout(predicate::str::contains("1  Utils (Low Priority)"));
}

#[test]
fn details_highlights_selected_violation() {
    let (_temp, input) = setup();

    let mut cmd = archlift("details", &input);
    cmd.args(["--group", "Utils", "--highlight", "0"]);
    let (ok, body) = run_json(cmd);

    assert!(ok, "{body}");
    assert_eq!(
        body["data"]["details"]["title"],
        "Detected 1 violations from Utils (Low Priority)"
    );
    assert_eq!(body["data"]["highlighted"][0]["id"], "v1");
    assert_eq!(body["data"]["visibility"], "highlighted");
}

#[test]
fn details_prints_text() {
    let (_temp, input) = setup();

    archlift("details", &input)
        .args(["--group", "Services (High Priority)"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Detected 5 violations from Services (High Priority)\n",
        ))
        .stdout(predicate::str::contains("Services → Ui"));
}

#[test]
fn unknown_group_is_reported_as_json_error() {
    let (_temp, input) = setup();

    let mut cmd = archlift("details", &input);
    cmd.args(["--group", "Nope"]);
    let (ok, body) = run_json(cmd);

    assert!(!ok);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("Nope"));
}

#[test]
fn invalid_hierarchy_fails() {
    let temp = tempfile::tempdir().unwrap();
    let input = write_document(
        temp.path(),
        r#"{"nodes": [{"id": "a", "parent": "b"}, {"id": "b", "parent": "a"}]}"#,
    );

    archlift("groups", &input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid node hierarchy"));
}
