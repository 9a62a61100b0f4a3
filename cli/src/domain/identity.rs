//! The agent's own identity file (`node.json`).

use serde_json::Value;

use crate::domain::config::EndpointHints;

/// What the agent knows about itself. Read-only to clawnode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIdentity {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub gateway_host: Option<String>,
    pub gateway_port: Option<u16>,
    pub gateway_tls: Option<bool>,
}

impl NodeIdentity {
    /// Identity carrying only a display name, used when `node.json` is
    /// missing or unreadable.
    #[must_use]
    pub fn fallback(display_name: Option<&str>) -> Self {
        Self {
            display_name: non_blank(display_name),
            ..Self::default()
        }
    }

    /// Parse `node.json`. Malformed content yields [`NodeIdentity::fallback`].
    #[must_use]
    pub fn parse(content: &str, fallback_name: Option<&str>) -> Self {
        let Ok(root) = serde_json::from_str::<Value>(content) else {
            return Self::fallback(fallback_name);
        };
        if !root.is_object() {
            return Self::fallback(fallback_name);
        }

        let id = non_blank(root.get("id").and_then(Value::as_str))
            .or_else(|| non_blank(root.get("nodeId").and_then(Value::as_str)));
        let display_name = non_blank(root.get("displayName").and_then(Value::as_str))
            .or_else(|| non_blank(fallback_name));

        let gateway = root.get("gateway").filter(|g| g.is_object());
        let field = |key: &str| gateway.and_then(|g| g.get(key));

        Self {
            id,
            display_name,
            gateway_host: non_blank(field("host").and_then(Value::as_str)),
            gateway_port: field("port")
                .and_then(Value::as_u64)
                .and_then(|p| u16::try_from(p).ok()),
            gateway_tls: field("tls").and_then(Value::as_bool),
        }
    }

    /// Endpoint values discovered from the identity file.
    #[must_use]
    pub fn endpoint_hints(&self) -> EndpointHints {
        EndpointHints {
            host: self.gateway_host.clone(),
            port: self.gateway_port,
            tls: self.gateway_tls,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
