//! `ApprovalService` policy handling, pending queue and notifications.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::Cell;

use anyhow::Result;
use clawnode_cli::application::ports::ApprovalHistoryLog;
use clawnode_cli::application::services::approval::{
    ApprovalEvent, ApprovalService, SubmitOutcome,
};
use clawnode_cli::domain::ApprovalError;
use clawnode_cli::infra::approval_history::InMemoryApprovalHistory;
use clawnode_common::{
    ApprovalDecision, ApprovalPolicy, ExecApprovalHistoryEntry, ExecApprovalRequest,
};

fn request(id: &str) -> ExecApprovalRequest {
    ExecApprovalRequest::new("git", "push origin main")
        .with_id(id)
        .with_requested_by("gateway")
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<ApprovalEvent>) -> Vec<ApprovalEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn test_allow_policy_records_without_queueing() {
    let svc = ApprovalService::new(|| ApprovalPolicy::Allow, InMemoryApprovalHistory::new());
    let mut rx = svc.subscribe();

    let outcome = svc.submit(request("r1")).unwrap();

    assert_eq!(outcome, SubmitOutcome::Decided(ApprovalDecision::Approved));
    assert!(svc.pending().is_empty());
    let history = svc.history(10).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].decision, ApprovalDecision::Approved);
    assert_eq!(history[0].policy, ApprovalPolicy::Allow);
    assert_eq!(drain(&mut rx), [ApprovalEvent::HistoryChanged]);
}

#[test]
fn test_deny_policy_records_denied() {
    let svc = ApprovalService::new(|| ApprovalPolicy::Deny, InMemoryApprovalHistory::new());

    let outcome = svc.submit(request("r1")).unwrap();

    assert_eq!(outcome, SubmitOutcome::Decided(ApprovalDecision::Denied));
    let history = svc.history(10).unwrap();
    assert_eq!(history[0].decision, ApprovalDecision::Denied);
    assert_eq!(history[0].policy, ApprovalPolicy::Deny);
}

#[test]
fn test_prompt_policy_queues_and_notifies() {
    let svc = ApprovalService::new(|| ApprovalPolicy::Prompt, InMemoryApprovalHistory::new());
    let mut rx = svc.subscribe();
    let req = request("r1");

    let outcome = svc.submit(req.clone()).unwrap();

    assert_eq!(outcome, SubmitOutcome::Queued);
    assert_eq!(svc.pending(), [req.clone()]);
    assert!(svc.history(10).unwrap().is_empty());
    assert_eq!(
        drain(&mut rx),
        [ApprovalEvent::Requested(req), ApprovalEvent::PendingChanged]
    );
}

#[test]
fn test_resubmitting_pending_id_is_a_no_op() {
    let svc = ApprovalService::new(|| ApprovalPolicy::Prompt, InMemoryApprovalHistory::new());
    svc.submit(request("r1")).unwrap();
    let mut rx = svc.subscribe();

    let outcome = svc.submit(request("r1")).unwrap();

    assert_eq!(outcome, SubmitOutcome::AlreadyPending);
    assert_eq!(svc.pending().len(), 1);
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_deny_twice_writes_one_entry() {
    let svc = ApprovalService::new(|| ApprovalPolicy::Prompt, InMemoryApprovalHistory::new());
    svc.submit(request("r1")).unwrap();
    let mut rx = svc.subscribe();

    assert!(svc.try_deny("r1"));
    assert!(!svc.try_deny("r1"));

    assert!(svc.pending().is_empty());
    let history = svc.history(10).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].decision, ApprovalDecision::Denied);
    assert_eq!(history[0].policy, ApprovalPolicy::Prompt);
    assert_eq!(
        drain(&mut rx),
        [ApprovalEvent::HistoryChanged, ApprovalEvent::PendingChanged]
    );
}

#[test]
fn test_approve_unknown_or_blank_id_fails() {
    let svc = ApprovalService::new(|| ApprovalPolicy::Prompt, InMemoryApprovalHistory::new());
    assert!(!svc.try_approve("missing"));
    assert!(!svc.try_approve("  "));
    assert!(svc.history(10).unwrap().is_empty());
}

#[test]
fn test_history_entry_preserves_request_fields() {
    let svc = ApprovalService::new(|| ApprovalPolicy::Prompt, InMemoryApprovalHistory::new());
    let req = request("r1").with_reason("deploy");
    svc.submit(req.clone()).unwrap();

    assert!(svc.try_approve("r1"));

    let entry = &svc.history(1).unwrap()[0];
    assert_eq!(entry.id, req.id);
    assert_eq!(entry.command, req.command);
    assert_eq!(entry.arguments, req.arguments);
    assert_eq!(entry.requested_at, req.requested_at);
    assert_eq!(entry.requested_by, req.requested_by);
    assert_eq!(entry.reason, req.reason);
    assert!(entry.decided_at >= entry.requested_at);
}

#[test]
fn test_policy_is_read_on_every_submit() {
    let policy = Cell::new(ApprovalPolicy::Prompt);
    let svc = ApprovalService::new(|| policy.get(), InMemoryApprovalHistory::new());

    assert_eq!(svc.submit(request("r1")).unwrap(), SubmitOutcome::Queued);
    policy.set(ApprovalPolicy::Allow);
    assert_eq!(
        svc.submit(request("r2")).unwrap(),
        SubmitOutcome::Decided(ApprovalDecision::Approved)
    );
    assert_eq!(svc.policy(), ApprovalPolicy::Allow);
    assert_eq!(svc.pending().len(), 1, "earlier request stays pending");
}

#[test]
fn test_blank_id_is_rejected() {
    let svc = ApprovalService::new(|| ApprovalPolicy::Allow, InMemoryApprovalHistory::new());

    let err = svc.submit(request("")).unwrap_err();

    assert_eq!(err, ApprovalError::MissingId);
    assert!(svc.history(10).unwrap().is_empty());
}

#[test]
fn test_pending_is_a_snapshot() {
    let svc = ApprovalService::new(|| ApprovalPolicy::Prompt, InMemoryApprovalHistory::new());
    svc.submit(request("r1")).unwrap();
    let snapshot = svc.pending();

    svc.try_approve("r1");

    assert_eq!(snapshot.len(), 1);
    assert!(svc.pending().is_empty());
}

struct FailingHistory;

impl ApprovalHistoryLog for FailingHistory {
    fn append(&self, _entry: &ExecApprovalHistoryEntry) -> Result<()> {
        anyhow::bail!("disk full")
    }

    fn read_recent(&self, _max_entries: usize) -> Result<Vec<ExecApprovalHistoryEntry>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_history_write_failure_does_not_undo_decision() {
    let svc = ApprovalService::new(|| ApprovalPolicy::Prompt, FailingHistory);
    svc.submit(request("r1")).unwrap();
    let mut rx = svc.subscribe();

    assert!(svc.try_approve("r1"));
    assert!(!svc.try_approve("r1"));
    assert!(svc.pending().is_empty());
    assert!(drain(&mut rx).contains(&ApprovalEvent::HistoryChanged));
}
