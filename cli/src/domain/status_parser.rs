//! Permissive parser for `openclaw node status` output.
//!
//! The agent's JSON shape is not stable across versions, so fields are looked
//! up by case-insensitive aliases anywhere in the document. When no usable JSON
//! is present the free text is run through an ordered keyword rule table.

use chrono::{DateTime, Utc};
use clawnode_common::{NodeIssue, NodeStatus};
use serde_json::Value;

// ── JSON key aliases ─────────────────────────────────────────────────────────

const INSTALLED_KEYS: &[&str] = &["installed", "serviceInstalled", "isInstalled", "loaded"];
const RUNNING_KEYS: &[&str] = &["running", "serviceRunning", "isRunning"];
const CONNECTED_KEYS: &[&str] = &["connected", "isConnected", "gatewayConnected"];
const STATE_KEYS: &[&str] = &["state", "status"];
const NODE_ID_KEYS: &[&str] = &["nodeId", "node_id", "id"];
const DISPLAY_NAME_KEYS: &[&str] = &["displayName", "display_name", "name"];
const GATEWAY_HOST_KEYS: &[&str] = &["gatewayHost", "host"];
const GATEWAY_PORT_KEYS: &[&str] = &["gatewayPort", "port"];
const LAST_ERROR_KEYS: &[&str] = &["lastError", "error", "reason"];
const LAST_CONNECTED_KEYS: &[&str] = &["lastConnectedAt", "lastConnected", "lastConnectTime"];

// ── Text heuristics ──────────────────────────────────────────────────────────

/// What a matching [`TextRule`] does to the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEffect {
    Running(bool),
    Connected(bool),
    /// Set the issue; the message is only used if no error was recorded yet.
    Issue(NodeIssue, &'static str),
}

/// A keyword rule: fires when the lowercased text contains any keyword.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub keywords: &'static [&'static str],
    pub effect: TextEffect,
}

/// Rules in evaluation order. Later rules overwrite the flags and issue set
/// by earlier ones, while the first recorded error message is kept.
///
/// Pairing comes after the token rule: pairing prompts usually mention a
/// token too, and pairing is the diagnosis the user can act on.
pub const TEXT_RULES: &[TextRule] = &[
    TextRule {
        keywords: &["running", "online"],
        effect: TextEffect::Running(true),
    },
    TextRule {
        keywords: &["stopped", "not running", "offline"],
        effect: TextEffect::Running(false),
    },
    TextRule {
        keywords: &["connected"],
        effect: TextEffect::Connected(true),
    },
    TextRule {
        keywords: &["disconnected"],
        effect: TextEffect::Connected(false),
    },
    TextRule {
        keywords: &["unauthorized", "token"],
        effect: TextEffect::Issue(NodeIssue::TokenInvalid, "Authentication failed."),
    },
    TextRule {
        keywords: &["pair", "approve", "pending"],
        effect: TextEffect::Issue(NodeIssue::PairingRequired, "Pairing required."),
    },
    TextRule {
        keywords: &["econnrefused", "unreachable", "enotfound"],
        effect: TextEffect::Issue(NodeIssue::GatewayUnreachable, "Gateway unreachable."),
    },
];

impl TextRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }

    fn apply(&self, status: &mut NodeStatus) {
        match self.effect {
            TextEffect::Running(value) => status.is_running = value,
            TextEffect::Connected(value) => status.is_connected = value,
            TextEffect::Issue(issue, message) => {
                status.issue = issue;
                status.set_error_if_empty(message);
            }
        }
    }
}

/// Run every rule in [`TEXT_RULES`] against `text`.
pub fn apply_text_rules(status: &mut NodeStatus, text: &str) {
    let lowered = text.to_lowercase();
    for rule in TEXT_RULES.iter().filter(|r| r.matches(&lowered)) {
        rule.apply(status);
    }
}

// ── Entry points ─────────────────────────────────────────────────────────────

/// Parse a JSON document and/or free text into a status.
///
/// Malformed JSON is ignored. Text heuristics run whenever text is supplied.
#[must_use]
pub fn parse(json: Option<&str>, text: Option<&str>) -> NodeStatus {
    let json = json.filter(|j| !j.trim().is_empty());
    let text = text.filter(|t| !t.trim().is_empty());

    let mut status = json
        .and_then(|j| serde_json::from_str::<Value>(j).ok())
        .map(|root| from_json(&root))
        .unwrap_or_default();
    if let Some(text) = text {
        apply_text_rules(&mut status, text);
    }
    status.raw_json = json.map(str::to_string);
    status.raw_text = text.map(str::to_string);
    status
}

/// Parse raw CLI output: JSON if a parseable document can be extracted,
/// free-text heuristics otherwise.
#[must_use]
pub fn parse_cli_output(output: &str) -> NodeStatus {
    match extract_json(output) {
        Some(json) if serde_json::from_str::<Value>(json).is_ok() => parse(Some(json), None),
        _ => parse(None, Some(output)),
    }
}

/// Locate a JSON document in CLI output that may be wrapped in log noise.
///
/// Output that is a whole JSON object or array is taken as is; otherwise the
/// span from the first `{` to the last `}` is returned. A leading `[info]`
/// log tag is noise, not an array.
#[must_use]
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<Value>(trimmed).is_ok()
    {
        return Some(trimmed);
    }
    let first = trimmed.find('{')?;
    let last = trimmed.rfind('}')?;
    (last > first).then(|| &trimmed[first..=last])
}

/// Fold a parsed status into one built from local facts.
///
/// Installation is sticky, the parsed running/connected flags replace the
/// base, and every optional field keeps the base value when it has one.
pub fn merge_into(base: &mut NodeStatus, parsed: NodeStatus) {
    base.is_installed |= parsed.is_installed;
    base.is_running = parsed.is_running;
    base.is_connected = parsed.is_connected;
    base.gateway_host = base.gateway_host.take().or(parsed.gateway_host);
    base.gateway_port = base.gateway_port.or(parsed.gateway_port);
    base.node_id = base.node_id.take().or(parsed.node_id);
    base.display_name = base.display_name.take().or(parsed.display_name);
    base.last_connected_at = base.last_connected_at.or(parsed.last_connected_at);
    base.last_error = base.last_error.take().or(parsed.last_error);
    if !base.issue.is_some() {
        base.issue = parsed.issue;
    }
    base.raw_json = base.raw_json.take().or(parsed.raw_json);
    base.raw_text = base.raw_text.take().or(parsed.raw_text);
}

// ── JSON mapping ─────────────────────────────────────────────────────────────

fn from_json(root: &Value) -> NodeStatus {
    let props = properties(root);
    let mut status = NodeStatus::default();

    if let Some(installed) = find(&props, INSTALLED_KEYS, as_bool) {
        status.is_installed = installed;
    }
    let running = find(&props, RUNNING_KEYS, as_bool);
    let connected = find(&props, CONNECTED_KEYS, as_bool);
    status.is_running = running.unwrap_or_default();
    status.is_connected = connected.unwrap_or_default();

    // The state string only fills in flags no explicit boolean decided.
    if let Some(state) = find(&props, STATE_KEYS, as_string) {
        let lowered = state.to_lowercase();
        if connected.is_none() && lowered.contains("connected") && !lowered.contains("disconnected") {
            status.is_connected = true;
        }
        if running.is_none() {
            if ["running", "online"].iter().any(|k| lowered.contains(k)) {
                status.is_running = true;
            }
            if ["stopped", "not running", "offline", "disconnected"]
                .iter()
                .any(|k| lowered.contains(k))
            {
                status.is_running = false;
            }
        }
    }

    status.node_id = find(&props, NODE_ID_KEYS, as_string);
    status.display_name = find(&props, DISPLAY_NAME_KEYS, as_string);
    status.gateway_host = find(&props, GATEWAY_HOST_KEYS, as_string);
    status.gateway_port = find(&props, GATEWAY_PORT_KEYS, as_port);
    status.last_error = find(&props, LAST_ERROR_KEYS, as_string);
    status.last_connected_at = find(&props, LAST_CONNECTED_KEYS, as_timestamp);
    status
}

/// Every `(key, value)` pair in the document, depth-first, parents before
/// their children.
fn properties(root: &Value) -> Vec<(&str, &Value)> {
    fn walk<'a>(value: &'a Value, out: &mut Vec<(&'a str, &'a Value)>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    out.push((key.as_str(), child));
                    walk(child, out);
                }
            }
            Value::Array(items) => items.iter().for_each(|item| walk(item, out)),
            _ => {}
        }
    }
    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

/// First alias (in order) with a property whose value converts.
fn find<T>(props: &[(&str, &Value)], aliases: &[&str], convert: fn(&Value) -> Option<T>) -> Option<T> {
    aliases.iter().find_map(|alias| {
        props
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(alias))
            .find_map(|(_, value)| convert(value))
    })
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn as_port(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
