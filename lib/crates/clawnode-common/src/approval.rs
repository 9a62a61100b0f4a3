use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of an exec approval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalDecision {
    Approved,
    Denied,
}

/// How exec requests relayed from the node are handled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalPolicy {
    /// Queue the request until a human resolves it.
    #[default]
    Prompt,
    Allow,
    Deny,
}

impl std::fmt::Display for ApprovalPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Prompt => "prompt",
            Self::Allow => "allow",
            Self::Deny => "deny",
        })
    }
}

impl std::str::FromStr for ApprovalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            other => Err(format!(
                "invalid approval policy '{other}': expected prompt, allow, or deny"
            )),
        }
    }
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// A request to run a command on this machine, relayed from the node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecApprovalRequest {
    #[serde(default = "generate_id")]
    pub id: String,
    pub command: String,
    #[serde(default)]
    pub arguments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
    #[serde(default = "Utc::now")]
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExecApprovalRequest {
    /// New request with a generated id, stamped now.
    #[must_use]
    pub fn new(command: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            command: command.into(),
            arguments: arguments.into(),
            requested_by: None,
            requested_at: Utc::now(),
            reason: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_requested_by(mut self, requested_by: impl Into<String>) -> Self {
        self.requested_by = Some(requested_by.into());
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_requested_at(mut self, requested_at: DateTime<Utc>) -> Self {
        self.requested_at = requested_at;
        self
    }
}

/// Immutable audit record of a resolved request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecApprovalHistoryEntry {
    pub id: String,
    pub command: String,
    pub arguments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub decided_at: DateTime<Utc>,
    pub decision: ApprovalDecision,
    /// Policy in effect when the decision was made.
    pub policy: ApprovalPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExecApprovalHistoryEntry {
    #[must_use]
    pub fn from_request(
        request: &ExecApprovalRequest,
        decision: ApprovalDecision,
        policy: ApprovalPolicy,
        decided_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: request.id.clone(),
            command: request.command.clone(),
            arguments: request.arguments.clone(),
            requested_by: request.requested_by.clone(),
            requested_at: request.requested_at,
            decided_at,
            decision,
            policy,
            reason: request.reason.clone(),
        }
    }
}
