//! Process exit codes for status-bearing commands.

use clawnode_common::{NodeIssue, NodeStatus};

pub const SUCCESS: i32 = 0;
pub const GENERIC_FAILURE: i32 = 1;
pub const DISCONNECTED: i32 = 2;
pub const DEGRADED: i32 = 3;
pub const CONFIG_MISSING: i32 = 10;
pub const AGENT_MISSING: i32 = 11;
pub const AUTH_TOKEN_ERROR: i32 = 12;
pub const PAIRING_REQUIRED: i32 = 13;

/// Exit code summarising a status for scripts.
#[must_use]
pub fn for_status(status: &NodeStatus) -> i32 {
    match status.issue {
        NodeIssue::AgentMissing => AGENT_MISSING,
        NodeIssue::ConfigMissing => CONFIG_MISSING,
        NodeIssue::TokenInvalid => AUTH_TOKEN_ERROR,
        NodeIssue::PairingRequired => PAIRING_REQUIRED,
        _ => match (status.is_running, status.is_connected) {
            (true, true) => SUCCESS,
            (true, false) => DEGRADED,
            (false, _) => DISCONNECTED,
        },
    }
}
