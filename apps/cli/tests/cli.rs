//! posetrack-cli 端到端测试（内置模拟后端）

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ENVIRONMENT: &str = "1@0,0,2.5|2@1.5,0,2.5|3@0,1.5,2.5";

const SCENARIO: &str = r#"
radius_m = 0.25
initialization_readings = 2

[[devices]]
id = 1
serial = "PT-T1"
session_length = 5
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("scenario.toml"), SCENARIO).unwrap();
        Self { dir }
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("posetrack-cli").unwrap();
        cmd.arg("--config")
            .arg(self.config())
            .arg("--scenario")
            .arg(self.path("scenario.toml"));
        cmd
    }

    fn set_environment(&self) {
        self.cli()
            .args(["config", "set", "--environment", ENVIRONMENT])
            .assert()
            .success();
    }
}

fn lines_starting_with(output: &[u8], prefix: &str) -> usize {
    String::from_utf8_lossy(output).lines().filter(|l| l.starts_with(prefix)).count()
}

#[test]
fn test_config_set_get_round_trip() {
    let ws = Workspace::new();
    ws.cli()
        .args(["config", "set", "--environment", ENVIRONMENT, "--placement", "0,0,1;0,0,0,1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("environment = "));
    assert!(ws.config().is_file());

    ws.cli()
        .args(["config", "get", "environment"])
        .assert()
        .success()
        .stdout(predicate::str::contains(ENVIRONMENT));

    ws.cli()
        .args(["config", "get", "placement"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0,0,1;0,0,0,1"));

    ws.cli().args(["config", "check"]).assert().success();
}

#[test]
fn test_config_rejects_bad_filter() {
    let ws = Workspace::new();
    ws.cli()
        .args(["config", "set", "--filter", "nonsense"])
        .assert()
        .failure();
    assert!(!ws.config().exists());
}

#[test]
fn test_config_check_reports_missing_environment() {
    let ws = Workspace::new();
    ws.cli()
        .args(["config", "check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("not set (required)"));
}

#[test]
fn test_markers_lists_environment() {
    let ws = Workspace::new();
    ws.set_environment();
    ws.cli()
        .arg("markers")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 marker(s)"))
        .stdout(predicate::str::contains("(1.5, 0, 2.5)"));
}

#[test]
fn test_devices_json() {
    let ws = Workspace::new();
    let output = ws.cli().args(["devices", "--json"]).output().unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["handle"], 1);
    assert_eq!(rows[0]["status"], "idle");
    assert_eq!(rows[0]["serial"], "PT-T1");
}

#[test]
fn test_run_single_session() {
    let ws = Workspace::new();
    ws.set_environment();

    let output = ws
        .cli()
        .args(["run", "--max-sessions", "1", "--interval-ms", "0"])
        .output()
        .unwrap();
    assert!(output.status.success());

    // 5 个读数，前 2 个处于惯性初始化阶段被跳过
    assert_eq!(lines_starting_with(&output.stdout, "["), 3);
    assert_eq!(lines_starting_with(&output.stdout, "[inertial"), 0);
}

#[test]
fn test_run_shows_initialization_on_request() {
    let ws = Workspace::new();
    ws.set_environment();

    let output = ws
        .cli()
        .args(["run", "--max-sessions", "2", "--interval-ms", "0", "--show-initialization"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(lines_starting_with(&output.stdout, "["), 10);
    assert_eq!(lines_starting_with(&output.stdout, "[inertial data initialization]"), 4);
}

#[test]
fn test_run_without_environment_fails() {
    let ws = Workspace::new();
    ws.cli()
        .args(["run", "--max-sessions", "1", "--interval-ms", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("environment"));
}

#[test]
fn test_unavailable_sdk_fails() {
    let ws = Workspace::new();
    ws.set_environment();
    fs::write(ws.path("scenario.toml"), "available = false\n").unwrap();

    ws.cli()
        .arg("devices")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}
