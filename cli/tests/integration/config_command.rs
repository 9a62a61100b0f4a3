//! `clawnode config` against a temporary home.

#![allow(clippy::expect_used)]

use std::os::unix::fs::PermissionsExt;

use predicates::prelude::*;

use crate::support::Fixture;

#[test]
fn test_config_show_defaults_without_file() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gateway.host:"))
        .stdout(predicate::str::contains("(not set)"))
        .stdout(predicate::str::contains("approvals.policy:"));
}

#[test]
fn test_config_set_then_show_json() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["config", "set", "gateway.host", "gw.example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set gateway.host = gw.example"));
    fx.clawnode()
        .args(["config", "set", "gateway.port", "18789"])
        .assert()
        .success();

    let output = fx
        .clawnode()
        .args(["--json", "config", "show"])
        .output()
        .expect("run config show");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["config"]["gateway"]["host"], "gw.example");
    assert_eq!(json["config"]["gateway"]["port"], 18789);
    assert_eq!(json["hasToken"], false);
    assert!(fx.file("config.yaml").exists());
}

#[test]
fn test_config_set_unknown_key_fails() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["config", "set", "gateway.colour", "blue"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown setting"));
    assert!(!fx.file("config.yaml").exists());
}

#[test]
fn test_config_set_invalid_policy_fails() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["config", "set", "approvals.policy", "maybe"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn test_config_error_as_json() {
    let fx = Fixture::new();
    let output = fx
        .clawnode()
        .args(["--json", "config", "set", "nope", "1"])
        .output()
        .expect("run config set");
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["error"], true);
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("Unknown setting"))
    );
}

#[test]
fn test_config_token_is_owner_only_and_clearable() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["config", "token", "s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gateway token saved"));

    let token = fx.file("token");
    assert_eq!(std::fs::read_to_string(&token).expect("token"), "s3cret");
    let mode = std::fs::metadata(&token).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    fx.clawnode()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stored"))
        .stdout(predicate::str::contains("s3cret").not());

    fx.clawnode()
        .args(["config", "token", "--clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gateway token removed"));
    assert!(!token.exists());
}

#[test]
fn test_config_token_from_stdin() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["config", "token", "-"])
        .write_stdin("piped-token\n")
        .assert()
        .success();
    assert_eq!(
        std::fs::read_to_string(fx.file("token")).expect("token"),
        "piped-token"
    );
}

#[test]
fn test_config_blank_token_rejected() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["config", "token", "   "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Token cannot be empty"));
}

#[test]
fn test_config_show_with_no_color_set() {
    let fx = Fixture::new();
    fx.clawnode()
        .env("NO_COLOR", "1")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b[").not());
}
