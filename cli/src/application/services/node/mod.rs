//! Node lifecycle orchestration over the `openclaw` CLI.
//!
//! [`NodeService`] combines CLI self-reports, the local process table and a
//! gateway-side probe into one [`NodeStatus`](clawnode_common::NodeStatus),
//! and drives install/connect/disconnect transitions with bounded waits.
//!
//! Status-returning operations never fail: missing preconditions become a
//! `NodeIssue` and spawn failures become a failed `ProcessResult`.
//! Install/Uninstall are pass-throughs and do return errors.

mod lifecycle;
mod status;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clawnode_common::ProcessResult;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::application::ports::{CommandRequest, CommandRunner, NodeEnvironment, ProcessDiscovery};
use crate::domain::activity;
use crate::domain::config::CompanionConfig;
use crate::domain::error::NodeError;
use crate::domain::redact::redact_secrets;

/// Environment variable carrying the gateway token to every invocation.
pub const GATEWAY_TOKEN_ENV: &str = "OPENCLAW_GATEWAY_TOKEN";

/// Time budgets for CLI calls and polling loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTimeouts {
    /// Default per-invocation timeout.
    pub command: Duration,
    /// `node status` and the gateway probe.
    pub status: Duration,
    pub poll_interval: Duration,
    pub connect: Duration,
    pub disconnect: Duration,
}

impl Default for NodeTimeouts {
    fn default() -> Self {
        Self {
            command: Duration::from_secs(15),
            status: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
            connect: Duration::from_secs(30),
            disconnect: Duration::from_secs(20),
        }
    }
}

/// The node lifecycle orchestrator.
///
/// Individual calls are safe to run concurrently, but callers should
/// serialize connect/disconnect/refresh against each other to avoid
/// overlapping CLI invocations.
pub struct NodeService<R, D, E> {
    runner: R,
    discovery: D,
    env: E,
    timeouts: NodeTimeouts,
}

impl<R, D, E> NodeService<R, D, E>
where
    R: CommandRunner,
    D: ProcessDiscovery,
    E: NodeEnvironment,
{
    pub fn new(runner: R, discovery: D, env: E) -> Self {
        Self {
            runner,
            discovery,
            env,
            timeouts: NodeTimeouts::default(),
        }
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: NodeTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Run `node install` with the configured gateway endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::AgentMissing`] if the CLI cannot be found,
    /// [`NodeError::ConfigMissing`] if no gateway host is configured, or the
    /// spawn error if the CLI cannot be executed.
    pub async fn install(&self, cancel: &CancellationToken) -> Result<ProcessResult> {
        let cli = self.env.find_cli().ok_or(NodeError::AgentMissing)?;
        let config = self.configured().ok_or(NodeError::ConfigMissing)?;
        let args = install_args(&config);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.invoke(&cli, &args, self.timeouts.command, cancel).await
    }

    /// Run `node uninstall --json`.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::AgentMissing`] if the CLI cannot be found, or the
    /// spawn error if the CLI cannot be executed.
    pub async fn uninstall(&self, cancel: &CancellationToken) -> Result<ProcessResult> {
        let cli = self.env.find_cli().ok_or(NodeError::AgentMissing)?;
        self.invoke(&cli, &["node", "uninstall", "--json"], self.timeouts.command, cancel)
            .await
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    /// Configuration with a gateway host, if one has been saved.
    fn configured(&self) -> Option<CompanionConfig> {
        if !self.env.exists() {
            return None;
        }
        let config = self.load_config();
        (!config.gateway.host.trim().is_empty()).then_some(config)
    }

    fn load_config(&self) -> CompanionConfig {
        self.env.load().unwrap_or_else(|e| {
            warn!(error = %format!("{e:#}"), "unreadable config, using defaults");
            CompanionConfig::default()
        })
    }

    /// Run the CLI and record the invocation in the activity log.
    async fn invoke(
        &self,
        cli: &Path,
        args: &[&str],
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<ProcessResult> {
        let program = cli.to_string_lossy();
        let token = self.env.load_token();
        let env: Vec<(&str, &str)> = token
            .as_deref()
            .map(|t| (GATEWAY_TOKEN_ENV, t))
            .into_iter()
            .collect();
        let request = CommandRequest::new(&program, args, timeout).with_env(&env);

        debug!(
            args = %redact_secrets(&args.join(" ")),
            timeout_secs = timeout.as_secs(),
            "invoking openclaw"
        );
        let result = self.runner.run(&request, cancel).await;
        match &result {
            Ok(r) => self.record(args, r),
            Err(e) => self.record(args, &ProcessResult::spawn_failed(format!("{e:#}"))),
        }
        result
    }

    /// [`Self::invoke`] with spawn failures folded into the result.
    async fn invoke_lenient(
        &self,
        cli: &Path,
        args: &[&str],
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ProcessResult {
        self.invoke(cli, args, timeout, cancel)
            .await
            .unwrap_or_else(|e| ProcessResult::spawn_failed(format!("{e:#}")))
    }

    fn record(&self, args: &[&str], result: &ProcessResult) {
        let entry = activity::format_entry(Local::now(), args, result);
        if let Err(e) = self.env.append(&entry) {
            warn!(error = %format!("{e:#}"), "failed to write node activity log");
        }
    }

    fn locate(&self) -> Option<PathBuf> {
        let cli = self.env.find_cli();
        if cli.is_none() {
            debug!("openclaw CLI not found");
        }
        cli
    }
}

/// `node install` arguments for a configuration.
#[must_use]
pub fn install_args(config: &CompanionConfig) -> Vec<String> {
    let gateway = &config.gateway;
    let mut args: Vec<String> = vec![
        "node".into(),
        "install".into(),
        "--host".into(),
        gateway.host.trim().to_string(),
        "--port".into(),
        gateway.port.to_string(),
    ];
    if gateway.tls {
        args.push("--tls".into());
    }
    if let Some(fp) = gateway.tls_fingerprint.as_deref().filter(|f| !f.trim().is_empty()) {
        args.extend(["--tls-fingerprint".into(), fp.trim().to_string()]);
    }
    if !config.display_name.trim().is_empty() {
        args.extend(["--display-name".into(), config.display_name.trim().to_string()]);
    }
    args.push("--force".into());
    args
}
