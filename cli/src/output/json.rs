//! JSON output for `--json` code paths.
//!
//! Everything is written to stdout as pretty-printed JSON, except `watch`
//! transitions, which are one compact object per line.

use std::path::Path;

use anyhow::{Context, Result};
use clawnode_common::{ApprovalPolicy, ExecApprovalHistoryEntry, NodeStatus, ProcessResult};
use serde::Serialize;

use crate::domain::config::CompanionConfig;
use crate::domain::health::DoctorChecks;

/// Renders domain types as JSON on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_status(self, status: &NodeStatus) -> Result<()> {
        print_pretty(status)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_transition(self, status: &NodeStatus) -> Result<()> {
        let line = serde_json::to_string(&serde_json::json!({
            "at": chrono::Utc::now(),
            "state": status.connection_state(),
            "status": status,
        }))
        .context("JSON serialization failed")?;
        println!("{line}");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(self, config: &CompanionConfig, path: &Path, has_token: bool) -> Result<()> {
        print_pretty(&serde_json::json!({
            "path": path,
            "config": config,
            "hasToken": has_token,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_doctor(self, checks: &DoctorChecks, issues: &[String]) -> Result<()> {
        print_pretty(&serde_json::json!({
            "checks": checks,
            "issues": issues,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_log_lines(self, lines: &[String]) -> Result<()> {
        print_pretty(&serde_json::json!({ "lines": lines }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_process_result(self, result: &ProcessResult) -> Result<()> {
        print_pretty(result)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_policy(self, policy: ApprovalPolicy) -> Result<()> {
        print_pretty(&serde_json::json!({ "policy": policy }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_history(self, entries: &[ExecApprovalHistoryEntry]) -> Result<()> {
        print_pretty(&entries)
    }
}

fn print_pretty<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{json}");
    Ok(())
}

/// Format a JSON error object for commands that fail under `--json`.
///
/// ```json
/// { "error": true, "message": "...", "code": "..." }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
