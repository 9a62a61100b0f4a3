//! Status, lifecycle, watch, logs and doctor against the fake `openclaw`.
//!
//! Connect and disconnect also scan and signal the host process table, so
//! they run serially.

#![allow(clippy::expect_used)]

use predicates::prelude::*;
use serial_test::serial;

use crate::support::{CONNECTED, Fixture, RUNNING, STOPPED};

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

// --- status ---

#[test]
fn test_status_without_cli_exits_agent_missing() {
    let fx = Fixture::configured();
    fx.clawnode_without_cli()
        .arg("status")
        .assert()
        .code(11)
        .stdout(predicate::str::contains("openclaw CLI not found"));
    assert!(fx.calls().is_empty());
}

#[test]
fn test_status_without_config_exits_config_missing() {
    let fx = Fixture::new();
    fx.clawnode()
        .arg("status")
        .assert()
        .code(10)
        .stdout(predicate::str::contains("Gateway not configured"));
}

#[test]
fn test_status_connected_exits_zero() {
    let fx = Fixture::configured();
    fx.set_status(CONNECTED);
    fx.clawnode()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("connected"))
        .stdout(predicate::str::contains("gw.example"));
    assert_eq!(fx.calls().first().map(String::as_str), Some("node status --json"));
}

#[test]
fn test_status_stopped_exits_disconnected() {
    let fx = Fixture::configured();
    fx.set_status(STOPPED);
    let output = fx
        .clawnode()
        .args(["--json", "status"])
        .output()
        .expect("run status");
    assert_eq!(output.status.code(), Some(2));
    let json = json_stdout(&output);
    assert_eq!(json["isInstalled"], true);
    assert_eq!(json["isRunning"], false);
    assert_eq!(json["issue"], "none");
}

#[test]
fn test_status_running_but_not_listed_is_degraded() {
    let fx = Fixture::configured();
    fx.set_status(RUNNING);
    let output = fx
        .clawnode()
        .args(["--json", "status"])
        .output()
        .expect("run status");
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(json_stdout(&output)["isConnected"], false);

    let calls = fx.calls();
    let probe = calls
        .iter()
        .find(|c| c.starts_with("nodes status --connected --json --url"))
        .expect("gateway probe");
    assert!(probe.ends_with("--token s3cret"), "got: {probe}");
}

#[test]
fn test_status_identity_supplies_node_id() {
    let fx = Fixture::configured();
    fx.write_identity(r#"{"nodeId":"node-abc","displayName":"Desk"}"#);
    fx.set_status(CONNECTED);
    let output = fx
        .clawnode()
        .args(["--json", "status"])
        .output()
        .expect("run status");
    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["nodeId"], "node-abc");
}

// --- install / uninstall ---

#[test]
fn test_install_passes_gateway_settings() {
    let fx = Fixture::configured();
    fx.clawnode()
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("service installed"))
        .stdout(predicate::str::contains("Install succeeded"));
    let calls = fx.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("node install --host gw.example --port 443"), "got: {}", calls[0]);
    assert!(calls[0].ends_with("--force"), "got: {}", calls[0]);
}

#[test]
fn test_install_without_config_fails() {
    let fx = Fixture::new();
    fx.clawnode()
        .arg("install")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config missing"));
    assert!(fx.calls().is_empty());
}

#[test]
fn test_uninstall_failure_exits_one() {
    let fx = Fixture::configured();
    fx.clawnode()
        .arg("uninstall")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("service busy"))
        .stderr(predicate::str::contains("Uninstall failed (exit 4)"));
}

#[test]
fn test_uninstall_json_reports_process_result() {
    let fx = Fixture::configured();
    let output = fx
        .clawnode()
        .args(["--json", "uninstall"])
        .output()
        .expect("run uninstall");
    assert_eq!(output.status.code(), Some(1));
    let json = json_stdout(&output);
    assert_eq!(json["exitCode"], 4);
    assert_eq!(json["timedOut"], false);
}

// --- connect / disconnect ---

#[test]
#[serial]
fn test_connect_when_already_connected() {
    let fx = Fixture::configured();
    fx.set_status(CONNECTED);
    fx.clawnode()
        .args(["connect", "--timeout", "5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Node connected"));
    let calls = fx.calls();
    assert!(calls.iter().any(|c| c == "node restart --json"));
    assert!(!calls.iter().any(|c| c.starts_with("node install")));
}

#[test]
#[serial]
fn test_connect_installs_missing_service_then_times_out() {
    let fx = Fixture::configured();
    fx.set_status(r#"{"installed":false,"running":false}"#);
    fx.clawnode()
        .args(["connect", "--timeout", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("did not connect"));
    let calls = fx.calls();
    let install = calls
        .iter()
        .position(|c| c.starts_with("node install"))
        .expect("install call");
    let restart = calls
        .iter()
        .position(|c| c == "node restart --json")
        .expect("restart call");
    assert!(install < restart);
}

#[test]
#[serial]
fn test_connect_without_config_does_nothing() {
    let fx = Fixture::new();
    fx.clawnode().arg("connect").assert().code(10);
    assert!(fx.calls().is_empty());
}

#[test]
#[serial]
fn test_disconnect_stops_service() {
    let fx = Fixture::configured();
    fx.set_status(STOPPED);
    fx.clawnode()
        .args(["disconnect", "--timeout", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Node stopped"));
    assert_eq!(fx.calls().first().map(String::as_str), Some("node stop --json"));
}

// --- watch ---

#[test]
fn test_watch_prints_one_line_per_stable_state() {
    let fx = Fixture::configured();
    fx.set_status(STOPPED);
    let output = fx
        .clawnode()
        .args(["--json", "watch", "--count", "2", "--interval", "1"])
        .output()
        .expect("run watch");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "got: {stdout}");
    let event: serde_json::Value = serde_json::from_str(lines[0]).expect("valid JSON line");
    assert_eq!(event["state"], "disconnected");
    assert_eq!(
        fx.calls().iter().filter(|c| c.as_str() == "node status --json").count(),
        2
    );
}

// --- logs ---

#[test]
fn test_logs_without_activity_fails() {
    let fx = Fixture::new();
    fx.clawnode()
        .arg("logs")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No activity log yet"));
}

#[test]
fn test_logs_show_redacted_invocations() {
    let fx = Fixture::configured();
    fx.set_status(RUNNING);
    fx.clawnode().arg("status").assert().code(3);

    fx.clawnode()
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("openclaw node status --json"))
        .stdout(predicate::str::contains("--token <redacted>"))
        .stdout(predicate::str::contains("s3cret").not());
}

#[test]
fn test_logs_follow_without_activity_fails_without_waiting() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["logs", "--tail"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No activity log yet"));
}

#[test]
fn test_logs_help_lists_follow() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["logs", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--follow"))
        .stdout(predicate::str::contains("tail"));
}

// --- doctor ---

#[test]
fn test_doctor_json_reports_checks_and_issues() {
    let fx = Fixture::new();
    let output = fx
        .clawnode()
        .args(["--json", "doctor"])
        .output()
        .expect("run doctor");
    assert_eq!(output.status.code(), Some(10));
    let json = json_stdout(&output);
    assert_eq!(json["checks"]["configured"], false);
    assert_eq!(json["checks"]["hasToken"], false);
    assert!(
        json["issues"]
            .as_array()
            .is_some_and(|issues| !issues.is_empty())
    );
}

#[test]
fn test_doctor_healthy_node() {
    let fx = Fixture::configured();
    fx.write_identity(r#"{"nodeId":"node-abc"}"#);
    fx.set_status(CONNECTED);
    fx.clawnode()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Everything looks good!"));
}
