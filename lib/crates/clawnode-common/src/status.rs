use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connection state derived from a [`NodeStatus`]. Never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Unknown,
    Disconnected,
    Connecting,
    Connected,
    Degraded,
    Error,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Degraded => "degraded",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// The single diagnosed problem attached to a status snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeIssue {
    #[default]
    None,
    AgentMissing,
    ConfigMissing,
    TokenMissing,
    TokenInvalid,
    PairingRequired,
    GatewayUnreachable,
    UnknownError,
}

impl NodeIssue {
    /// Whether any issue is set.
    #[must_use]
    pub fn is_some(self) -> bool {
        self != Self::None
    }
}

/// Canonical view of the node agent's health.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct NodeStatus {
    /// The `openclaw` CLI binary was found.
    pub is_agent_available: bool,
    pub is_installed: bool,
    pub is_running: bool,
    pub is_connected: bool,
    /// A node process is running outside the managed service.
    pub has_foreground_process: bool,
    pub gateway_host: Option<String>,
    pub gateway_port: Option<u16>,
    pub node_id: Option<String>,
    pub display_name: Option<String>,
    pub last_connected_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub issue: NodeIssue,
    /// This particular probe failed; not the same as "disconnected".
    pub is_status_check_failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_json: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl NodeStatus {
    /// Status returned when the `openclaw` CLI cannot be located.
    #[must_use]
    pub fn agent_missing() -> Self {
        Self {
            is_agent_available: false,
            issue: NodeIssue::AgentMissing,
            last_error: Some("openclaw CLI not found.".to_string()),
            ..Self::default()
        }
    }

    /// Status returned when no local configuration exists.
    #[must_use]
    pub fn config_missing() -> Self {
        Self {
            is_agent_available: true,
            issue: NodeIssue::ConfigMissing,
            last_error: Some("Config missing.".to_string()),
            ..Self::default()
        }
    }

    /// Derive the connection state.
    ///
    /// Any issue other than `TokenMissing` is an error regardless of the
    /// running/connected flags. A missing token is the expected state before
    /// first setup and falls through to the flag-based states.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        if self.issue.is_some() && self.issue != NodeIssue::TokenMissing {
            return ConnectionState::Error;
        }
        match (self.is_running, self.is_connected) {
            (true, true) => ConnectionState::Connected,
            (true, false) => ConnectionState::Degraded,
            (false, _) => ConnectionState::Disconnected,
        }
    }

    /// Set `last_error` only if nothing has been recorded yet.
    pub fn set_error_if_empty(&mut self, message: impl Into<String>) {
        if self.last_error.as_deref().is_none_or(|e| e.trim().is_empty()) {
            self.last_error = Some(message.into());
        }
    }
}
