//! Doctor check types and pure diagnostic functions.
//!
//! Free of I/O: the `doctor` command gathers the facts, this module judges
//! them.

use std::path::PathBuf;

use clawnode_common::{NodeIssue, NodeStatus};
use serde::Serialize;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Local installation facts gathered by the doctor command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorChecks {
    /// Resolved path of the `openclaw` CLI, if found.
    pub cli_path: Option<PathBuf>,
    pub config_path: PathBuf,
    /// Whether `config.yaml` exists and names a gateway host.
    pub configured: bool,
    pub has_token: bool,
    /// Node id from the agent's identity file.
    pub node_id: Option<String>,
    pub status: NodeStatus,
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// Collect actionable issues from check results, most fundamental first.
#[must_use]
pub fn collect_issues(checks: &DoctorChecks) -> Vec<String> {
    let mut issues = Vec::new();
    if checks.cli_path.is_none() {
        issues.push("openclaw CLI not found (install it or set OPENCLAW_CLI_PATH)".to_string());
        return issues;
    }
    if !checks.configured {
        issues.push("No gateway configured (run: clawnode config set gateway.host <host>)".to_string());
    }
    if !checks.has_token {
        issues.push("No gateway token stored (run: clawnode config token <token>)".to_string());
    }
    if checks.node_id.is_none() {
        issues.push("Node identity not found (the node has not been paired yet)".to_string());
    }
    match checks.status.issue {
        NodeIssue::TokenInvalid => {
            issues.push("Gateway rejected the token".to_string());
        }
        NodeIssue::PairingRequired => {
            issues.push("Pairing required (approve this node on the gateway)".to_string());
        }
        NodeIssue::GatewayUnreachable => {
            issues.push("Gateway unreachable".to_string());
        }
        NodeIssue::UnknownError => {
            let detail = checks.status.last_error.as_deref().unwrap_or("unknown error");
            issues.push(format!("Node reported an error: {detail}"));
        }
        _ => {}
    }
    if checks.status.is_status_check_failed {
        issues.push("Status check timed out".to_string());
    }
    issues
}

// ── Unit tests ────────────────────────────────────────────────────────────────
