//! Argument parsing and help output.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn clawnode() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("clawnode"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    // An env-supplied flag counts as an argument and suppresses the help.
    clawnode()
        .env_remove("NO_COLOR")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Lifecycle companion"));
}

#[test]
fn test_cli_help_lists_commands() {
    clawnode()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("connect"))
        .stdout(predicate::str::contains("disconnect"))
        .stdout(predicate::str::contains("approvals"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    clawnode()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clawnode"));
}

#[test]
fn test_cli_unknown_command_fails() {
    clawnode()
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_config_token_requires_value_or_clear() {
    clawnode()
        .args(["config", "token"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_review_yes_conflicts_with_deny_all() {
    clawnode()
        .args(["approvals", "review", "-", "--yes", "--deny-all"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_connect_rejects_non_numeric_timeout() {
    clawnode()
        .args(["connect", "--timeout", "soon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_no_color_env_accepts_conventional_values() {
    let home = tempfile::TempDir::new().expect("temp dir");
    for value in ["1", "true", "yes", "0", "false"] {
        clawnode()
            .env("NO_COLOR", value)
            .env("CLAWNODE_HOME", home.path())
            .env_remove("CLAWNODE_CONFIG")
            .args(["approvals", "policy"])
            .assert()
            .success()
            .stdout(predicate::str::contains("prompt"));
    }
}
