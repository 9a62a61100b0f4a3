//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Node errors ───────────────────────────────────────────────────────────────

/// Precondition failures for commands that must not run with bad inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeError {
    #[error("openclaw CLI not found. Install it or set OPENCLAW_CLI_PATH.")]
    AgentMissing,

    #[error("Config missing. Run 'clawnode config set gateway.host <host>' first.")]
    ConfigMissing,
}

// ── Approval errors ───────────────────────────────────────────────────────────

/// Programmer errors when submitting approval requests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("Request id is required.")]
    MissingId,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
