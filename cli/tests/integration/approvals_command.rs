//! `clawnode approvals` with policies read from the temporary config.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::support::Fixture;

const REQUESTS: &str = r#"{"id":"r1","command":"git","arguments":"push","requestedBy":"gateway"}
{"id":"r2","command":"ls","arguments":"-la"}
"#;

fn history_json(fx: &Fixture) -> Vec<serde_json::Value> {
    let output = fx
        .clawnode()
        .args(["--json", "approvals", "history"])
        .output()
        .expect("run history");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

#[test]
fn test_policy_defaults_to_prompt() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["approvals", "policy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prompt"));
}

#[test]
fn test_allow_policy_approves_every_request() {
    let fx = Fixture::new();
    fx.write_config("approvals:\n  policy: allow\n");
    let file = fx.file("requests.jsonl");
    std::fs::write(&file, REQUESTS).expect("write requests");

    fx.clawnode()
        .args(["approvals", "review"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("approved"))
        .stdout(predicate::str::contains("git push"));

    let history = history_json(&fx);
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|e| e["decision"] == "approved" && e["policy"] == "allow"));
    assert_eq!(history[0]["requestedBy"], "gateway");
}

#[test]
fn test_prompt_policy_deny_all_from_stdin() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["approvals", "review", "-", "--deny-all"])
        .write_stdin(REQUESTS)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: git push"))
        .stdout(predicate::str::contains("denied"));

    let history = history_json(&fx);
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|e| e["decision"] == "denied" && e["policy"] == "prompt"));
}

#[test]
fn test_prompt_policy_yes_approves_pending() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["approvals", "review", "-", "--yes"])
        .write_stdin(REQUESTS)
        .assert()
        .success();
    let history = history_json(&fx);
    assert!(history.iter().all(|e| e["decision"] == "approved"));
}

#[test]
fn test_non_interactive_review_denies_by_default() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["approvals", "review", "-"])
        .write_stdin(REQUESTS)
        .assert()
        .success();
    let history = history_json(&fx);
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|e| e["decision"] == "denied"));
}

#[test]
fn test_malformed_lines_are_skipped() {
    let fx = Fixture::new();
    fx.write_config("approvals:\n  policy: deny\n");
    fx.clawnode()
        .args(["approvals", "review", "-"])
        .write_stdin("not json\n{\"id\":\"  \",\"command\":\"rm\"}\n{\"command\":\"whoami\"}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping line 1"))
        .stdout(predicate::str::contains("Skipping line 2"));
    let history = history_json(&fx);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["command"], "whoami");
}

#[test]
fn test_history_limit() {
    let fx = Fixture::new();
    fx.write_config("approvals:\n  policy: allow\n");
    fx.clawnode()
        .args(["approvals", "review", "-"])
        .write_stdin(REQUESTS)
        .assert()
        .success();
    fx.clawnode()
        .args(["approvals", "history", "-n", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ls -la"))
        .stdout(predicate::str::contains("git push").not());
}

#[test]
fn test_empty_history() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["approvals", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No approval history."));
}

#[test]
fn test_missing_request_file_fails() {
    let fx = Fixture::new();
    fx.clawnode()
        .args(["approvals", "review"])
        .arg(fx.file("absent.jsonl"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}
