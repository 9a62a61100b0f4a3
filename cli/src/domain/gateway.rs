//! Interpretation of the gateway-side `nodes status --connected` probe.

use clawnode_common::{NodeIssue, ProcessResult};

use crate::domain::identity::NodeIdentity;

/// What the gateway probe told us.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayProbe {
    /// `None` when the probe gave no definitive answer.
    pub connected: Option<bool>,
    pub issue: Option<NodeIssue>,
    pub message: Option<&'static str>,
}

impl GatewayProbe {
    fn issue(issue: NodeIssue, message: &'static str) -> Self {
        Self {
            connected: None,
            issue: Some(issue),
            message: Some(message),
        }
    }
}

/// Whether the connected-node listing mentions this node, by id or display
/// name, case-insensitively.
#[must_use]
pub fn contains_node(text: &str, identity: &NodeIdentity) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    let haystack = text.to_lowercase();
    [identity.id.as_deref(), identity.display_name.as_deref()]
        .into_iter()
        .flatten()
        .filter(|needle| !needle.trim().is_empty())
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

/// Classify the result of a gateway probe run.
#[must_use]
pub fn classify_probe(result: &ProcessResult, identity: &NodeIdentity) -> GatewayProbe {
    if result.timed_out {
        return GatewayProbe {
            message: Some("Gateway status check timed out."),
            ..GatewayProbe::default()
        };
    }

    let output = result.combined_output();
    if result.exit_code != 0 {
        let lowered = output.to_lowercase();
        if lowered.contains("pairing required") {
            return GatewayProbe::issue(NodeIssue::PairingRequired, "Gateway pairing required.");
        }
        if lowered.contains("unauthorized") || lowered.contains("token") {
            return GatewayProbe::issue(NodeIssue::TokenInvalid, "Gateway token invalid or missing.");
        }
        return GatewayProbe::default();
    }

    GatewayProbe {
        connected: Some(contains_node(output, identity)),
        ..GatewayProbe::default()
    }
}
