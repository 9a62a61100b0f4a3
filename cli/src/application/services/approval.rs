//! Exec approval gate: policy evaluation, pending queue and audit history.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use chrono::Utc;
use clawnode_common::{
    ApprovalDecision, ApprovalPolicy, ExecApprovalHistoryEntry, ExecApprovalRequest,
};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::application::ports::{ApprovalHistoryLog, PolicySource};
use crate::domain::error::ApprovalError;

const EVENT_CAPACITY: usize = 64;

/// Notifications emitted by [`ApprovalService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalEvent {
    /// A request entered the pending queue and needs a human decision.
    Requested(ExecApprovalRequest),
    PendingChanged,
    HistoryChanged,
}

/// What happened to a submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Decided immediately by the `allow` or `deny` policy.
    Decided(ApprovalDecision),
    /// Queued for a human decision.
    Queued,
    /// A request with the same id is already pending.
    AlreadyPending,
}

/// Gates execution requests behind the prompt/allow/deny policy.
///
/// Pending-queue mutations are serialized under one lock. Events are sent
/// after the lock is released.
pub struct ApprovalService<P, H> {
    policy: P,
    history: H,
    pending: Mutex<Vec<ExecApprovalRequest>>,
    events: broadcast::Sender<ApprovalEvent>,
}

impl<P, H> ApprovalService<P, H>
where
    P: PolicySource,
    H: ApprovalHistoryLog,
{
    pub fn new(policy: P, history: H) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            policy,
            history,
            pending: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Subscribe to approval notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ApprovalEvent> {
        self.events.subscribe()
    }

    /// The policy in effect right now.
    pub fn policy(&self) -> ApprovalPolicy {
        self.policy.current_policy()
    }

    /// Submit a request for approval, evaluating the current policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::MissingId`] if the request id is blank.
    pub fn submit(&self, request: ExecApprovalRequest) -> Result<SubmitOutcome, ApprovalError> {
        if request.id.trim().is_empty() {
            return Err(ApprovalError::MissingId);
        }

        let policy = self.policy.current_policy();
        let decision = match policy {
            ApprovalPolicy::Allow => Some(ApprovalDecision::Approved),
            ApprovalPolicy::Deny => Some(ApprovalDecision::Denied),
            ApprovalPolicy::Prompt => None,
        };
        if let Some(decision) = decision {
            self.record(&request, decision, policy);
            return Ok(SubmitOutcome::Decided(decision));
        }

        {
            let mut pending = self.lock_pending();
            if pending.iter().any(|p| p.id == request.id) {
                return Ok(SubmitOutcome::AlreadyPending);
            }
            pending.push(request.clone());
        }

        info!(id = %request.id, command = %request.command, "exec approval requested");
        self.emit(ApprovalEvent::Requested(request));
        self.emit(ApprovalEvent::PendingChanged);
        Ok(SubmitOutcome::Queued)
    }

    /// Approve a pending request. Returns `false` if it is not pending.
    pub fn try_approve(&self, id: &str) -> bool {
        self.resolve(id, ApprovalDecision::Approved)
    }

    /// Deny a pending request. Returns `false` if it is not pending.
    pub fn try_deny(&self, id: &str) -> bool {
        self.resolve(id, ApprovalDecision::Denied)
    }

    /// Snapshot of the pending queue, oldest first.
    pub fn pending(&self) -> Vec<ExecApprovalRequest> {
        self.lock_pending().clone()
    }

    /// The most recent history entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the history log cannot be read.
    pub fn history(&self, max_entries: usize) -> Result<Vec<ExecApprovalHistoryEntry>> {
        self.history.read_recent(max_entries)
    }

    fn resolve(&self, id: &str, decision: ApprovalDecision) -> bool {
        if id.trim().is_empty() {
            return false;
        }
        let request = {
            let mut pending = self.lock_pending();
            let Some(index) = pending.iter().position(|p| p.id == id) else {
                return false;
            };
            pending.remove(index)
        };

        // Resolution is only reachable under the prompt policy.
        self.record(&request, decision, ApprovalPolicy::Prompt);
        self.emit(ApprovalEvent::PendingChanged);
        true
    }

    fn record(&self, request: &ExecApprovalRequest, decision: ApprovalDecision, policy: ApprovalPolicy) {
        let entry = ExecApprovalHistoryEntry::from_request(request, decision, policy, Utc::now());
        info!(id = %entry.id, command = %entry.command, ?decision, %policy, "exec approval decided");
        if let Err(e) = self.history.append(&entry) {
            warn!(error = %format!("{e:#}"), id = %entry.id, "failed to append approval history");
        }
        self.emit(ApprovalEvent::HistoryChanged);
    }

    fn emit(&self, event: ApprovalEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn lock_pending(&self) -> MutexGuard<'_, Vec<ExecApprovalRequest>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
