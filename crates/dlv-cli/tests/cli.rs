//! End-to-end tests for the `dlv` binary.
//!
//! Each test gets its own temp dir holding the log and settings files, and
//! runs the binary with environment fallbacks cleared.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
    log: PathBuf,
    settings: PathBuf,
}

impl Workspace {
    fn new(content: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let log = dir.path().join("debug.log");
        let settings = dir.path().join("settings.json");
        fs::write(&log, content).expect("write log");
        Self { dir, log, settings }
    }

    fn dlv(&self, environment: &str) -> Command {
        let mut cmd = Command::cargo_bin("dlv").expect("binary");
        cmd.env_remove("DLV_LOG_FILE")
            .env_remove("DLV_SETTINGS")
            .env_remove("DLV_ENVIRONMENT")
            .env_remove("DLV_CAPABILITIES")
            .env_remove("DLV_TIMEZONE")
            .env_remove("RUST_LOG")
            .arg("--log-file")
            .arg(&self.log)
            .arg("--settings")
            .arg(&self.settings)
            .arg("--environment")
            .arg(environment)
            .arg("--timezone")
            .arg("utc");
        cmd
    }

    fn log_content(&self) -> String {
        fs::read_to_string(&self.log).expect("read log")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn numbered(n: usize) -> String {
    (1..=n).map(|i| format!("line {i}\n")).collect()
}

fn read_json(bytes: &[u8]) -> serde_json::Value {
    serde_json::from_slice(bytes).expect("valid json")
}

#[test]
fn tail_prints_last_lines() {
    let ws = Workspace::new(&numbered(10));
    ws.dlv("development")
        .args(["tail", "--lines", "3"])
        .assert()
        .success()
        .stdout("line 8\nline 9\nline 10\n");
}

#[test]
fn tail_json_reports_counts() {
    let ws = Workspace::new(&numbered(100));
    let output = ws
        .dlv("development")
        .args(["--format", "json", "tail"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let json = read_json(&output.stdout);
    assert_eq!(json["tail"]["mode"], "lines");
    assert_eq!(json["tail"]["lineCountReturned"], 50);
    assert_eq!(json["stats"]["exists"], true);
    assert_eq!(json["access"]["canClear"], true);
}

#[test]
fn tail_minutes_keeps_recent_and_untimestamped_lines() {
    let now = chrono::Utc::now();
    let old = now - chrono::Duration::hours(2);
    let content = format!(
        "[{}] old entry\n[{}] fresh entry\nstack frame without timestamp\n",
        old.format("%Y-%m-%d %H:%M:%S"),
        now.format("%Y-%m-%d %H:%M:%S"),
    );
    let ws = Workspace::new(&content);
    let output = ws
        .dlv("development")
        .args(["--format", "json", "tail", "--minutes", "10"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let json = read_json(&output.stdout);
    let lines = json["tail"]["lines"].as_array().expect("lines");
    assert_eq!(lines.len(), 2);
    assert!(lines[0].as_str().is_some_and(|l| l.ends_with("fresh entry")));
    assert_eq!(json["tail"]["linesScanned"], 3);
    assert_eq!(json["tail"]["truncatedByFallback"], true);
}

#[test]
fn missing_log_exits_not_found_with_hint() {
    let ws = Workspace::new("");
    fs::remove_file(&ws.log).expect("remove");
    ws.dlv("development")
        .arg("tail")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn stats_table_shows_permissions() {
    let ws = Workspace::new("hello\n");
    ws.dlv("production")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Size:      6 B"))
        .stdout(predicate::str::contains("denied (clear is disabled in production"));
}

#[test]
fn clear_refused_in_production() {
    let ws = Workspace::new("keep\n");
    ws.dlv("production")
        .arg("clear")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Hint: Enable the production override"));
    assert_eq!(ws.log_content(), "keep\n");
}

#[test]
fn misspelled_environment_is_treated_as_production() {
    let ws = Workspace::new("secret\n");
    ws.dlv("prodution")
        .arg("clear")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Hint: Enable the production override"));
    assert_eq!(ws.log_content(), "secret\n");

    ws.dlv("").arg("download").assert().code(4);
}

#[test]
fn local_environment_allows_clear() {
    let ws = Workspace::new("scratch\n");
    ws.dlv("local").arg("clear").assert().success();
    assert_eq!(ws.log_content(), "");
}

#[test]
fn override_then_clear_in_production() {
    let ws = Workspace::new("secret\n");
    ws.dlv("production")
        .args(["override", "enable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("production override enabled for 15 minutes"));

    ws.dlv("production")
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Log cleared at "));
    assert_eq!(ws.log_content(), "");

    ws.dlv("production")
        .args(["override", "disable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("production override disabled"));
    ws.dlv("production").arg("clear").assert().code(4);
}

#[test]
fn download_to_file() {
    let ws = Workspace::new("payload\n");
    let target = ws.path("copy.log");
    ws.dlv("development")
        .arg("download")
        .arg("--output")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved debug.log (8 bytes)"));
    assert_eq!(fs::read_to_string(&target).expect("read copy"), "payload\n");
}

#[test]
fn download_to_stdout_is_raw() {
    let ws = Workspace::new("raw bytes\n");
    ws.dlv("development")
        .arg("download")
        .assert()
        .success()
        .stdout("raw bytes\n");
}

#[test]
fn download_disabled_by_setting() {
    let ws = Workspace::new("x\n");
    ws.dlv("development")
        .args(["settings", "set", "download-enabled", "false"])
        .assert()
        .success();
    ws.dlv("development")
        .arg("download")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("download is disabled in settings"));
}

#[test]
fn sub_scope_cannot_clear_by_default() {
    let ws = Workspace::new("x\n");
    ws.dlv("development")
        .args(["--sub-scope", "clear"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("top-level"));
}

#[test]
fn view_only_caller_cannot_toggle_grants() {
    let ws = Workspace::new("");
    ws.dlv("production")
        .args(["--capabilities", "view", "temp-logging", "enable"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("missing capability: admin"));
}

#[test]
fn settings_set_persists_raw_value() {
    let ws = Workspace::new(&numbered(20));
    ws.dlv("development")
        .args(["settings", "set", "maxLines", "5"])
        .assert()
        .success();

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&ws.settings).expect("settings file"))
            .expect("json");
    assert_eq!(stored["maxLines"], 5);

    ws.dlv("development")
        .args(["tail", "-n", "100"])
        .assert()
        .success()
        .stdout(predicate::function(|out: &str| out.lines().count() == 5));
}

#[test]
fn unknown_setting_is_rejected() {
    let ws = Workspace::new("");
    ws.dlv("development")
        .args(["settings", "set", "colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown setting: colour"));
    assert!(!Path::new(&ws.settings).exists());
}

#[test]
fn temp_logging_json_response() {
    let ws = Workspace::new("");
    let output = ws
        .dlv("staging")
        .args(["--format", "json", "temp-logging", "enable"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json = read_json(&output.stdout);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "temporary logging enabled for 15 minutes");
    assert_eq!(json["access"]["loggingEffective"], true);
}
