//! Domain types and validators for clawnode configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use anyhow::Result;
use clawnode_common::ApprovalPolicy;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "gateway.host",
    "gateway.port",
    "gateway.tls",
    "gateway.tls_fingerprint",
    "display_name",
    "approvals.policy",
    "poll_interval_secs",
];
pub const VALID_POLICIES: &[&str] = &["prompt", "allow", "deny"];
const VALID_BOOLS: &[&str] = &["true", "false"];

pub const DEFAULT_GATEWAY_PORT: u16 = 443;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.clawnode/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompanionConfig {
    pub gateway: GatewayConfig,
    /// Name the node registers with at the gateway.
    pub display_name: String,
    pub approvals: ApprovalsConfig,
    /// Seconds between polls in `clawnode watch`.
    pub poll_interval_secs: u64,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            display_name: default_display_name(),
            approvals: ApprovalsConfig::default(),
            poll_interval_secs: 5,
        }
    }
}

/// Gateway connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Empty means "not configured".
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub tls_fingerprint: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_GATEWAY_PORT,
            tls: true,
            tls_fingerprint: None,
        }
    }
}

/// Exec approval settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApprovalsConfig {
    pub policy: ApprovalPolicy,
}

fn default_display_name() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "clawnode".to_string())
}

impl CompanionConfig {
    /// Explicitly configured endpoint values.
    #[must_use]
    pub fn endpoint_hints(&self) -> EndpointHints {
        EndpointHints {
            host: non_blank(&self.gateway.host),
            port: Some(self.gateway.port),
            tls: Some(self.gateway.tls),
        }
    }

    /// Apply a validated `key = value` setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "gateway.host" => self.gateway.host = value.trim().to_string(),
            "gateway.port" => self.gateway.port = parse_port(key, value)?,
            "gateway.tls" => self.gateway.tls = value == "true",
            "gateway.tls_fingerprint" => self.gateway.tls_fingerprint = non_blank(value),
            "display_name" => self.display_name = value.trim().to_string(),
            "approvals.policy" => {
                self.approvals.policy = value.parse().map_err(|_| invalid(key, value, VALID_POLICIES))?;
            }
            "poll_interval_secs" => {
                self.poll_interval_secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or_else(|| invalid(key, value, &["a positive integer"]))?;
            }
            _ => return validate_config_key(key),
        }
        Ok(())
    }
}

// ── Endpoint precedence ──────────────────────────────────────────────────────

/// Partial gateway endpoint as known by one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointHints {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<bool>,
}

impl EndpointHints {
    fn has_host(&self) -> bool {
        self.host.as_deref().is_some_and(|h| !h.trim().is_empty())
    }

    /// `scheme://host:port`, if a host is known.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        let host = self.host.as_deref().filter(|h| !h.trim().is_empty())?;
        let scheme = if self.tls.unwrap_or(true) { "https" } else { "http" };
        let port = self.port.unwrap_or(DEFAULT_GATEWAY_PORT);
        Some(format!("{scheme}://{host}:{port}"))
    }
}

/// Merge explicit configuration with what the agent's identity file reports.
///
/// An explicitly configured host wins outright together with its port and
/// TLS flag. Without one, every field comes from the identity first and
/// falls back to configuration.
#[must_use]
pub fn resolve_endpoint(explicit: &EndpointHints, discovered: &EndpointHints) -> EndpointHints {
    let empty = EndpointHints::default();
    let (primary, secondary) = if explicit.has_host() {
        (explicit, &empty)
    } else {
        (discovered, explicit)
    };
    EndpointHints {
        host: primary.host.clone().or_else(|| secondary.host.clone()).filter(|h| !h.trim().is_empty()),
        port: primary.port.or(secondary.port),
        tls: primary.tls.or(secondary.tls),
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    match key {
        "approvals.policy" if !VALID_POLICIES.contains(&value.to_lowercase().as_str()) => {
            Err(invalid(key, value, VALID_POLICIES).into())
        }
        "gateway.tls" if !VALID_BOOLS.contains(&value) => Err(invalid(key, value, VALID_BOOLS).into()),
        "gateway.port" => parse_port(key, value).map(|_| ()),
        _ => Ok(()),
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16> {
    value
        .parse::<u16>()
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| invalid(key, value, &["1-65535"]).into())
}

fn invalid(key: &str, value: &str, valid: &[&str]) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid: valid.join(", "),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
