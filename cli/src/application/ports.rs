//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and shared types — never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clawnode_common::{ApprovalPolicy, ExecApprovalHistoryEntry, ProcessResult};
use tokio_util::sync::CancellationToken;

use crate::domain::{CompanionConfig, NodeIdentity};

// ── Value Types ───────────────────────────────────────────────────────────────

/// One external command invocation.
#[derive(Debug, Clone, Copy)]
pub struct CommandRequest<'a> {
    pub program: &'a str,
    pub args: &'a [&'a str],
    /// Extra environment variables for the child.
    pub env: &'a [(&'a str, &'a str)],
    pub timeout: Duration,
}

impl<'a> CommandRequest<'a> {
    #[must_use]
    pub fn new(program: &'a str, args: &'a [&'a str], timeout: Duration) -> Self {
        Self {
            program,
            args,
            env: &[],
            timeout,
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: &'a [(&'a str, &'a str)]) -> Self {
        self.env = env;
        self
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program, capturing stdout, stderr and the exit code.
    ///
    /// Exceeding `request.timeout` or cancellation of `cancel` kills the
    /// child and yields a result with `timed_out` set, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be spawned.
    async fn run(
        &self,
        request: &CommandRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<ProcessResult>;
}

// ── Agent Environment Ports ───────────────────────────────────────────────────

/// Finds the `openclaw` executable.
pub trait CliLocator {
    fn find_cli(&self) -> Option<PathBuf>;
}

/// Abstracts configuration persistence (load/save).
pub trait ConfigStore {
    /// Whether a configuration file has been written.
    fn exists(&self) -> bool;
    /// Load the configuration, or defaults if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<CompanionConfig>;
    /// Persist the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &CompanionConfig) -> Result<()>;
    /// Path of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if no location can be determined.
    fn path(&self) -> Result<PathBuf>;
}

/// Gateway token storage.
pub trait TokenStore {
    fn load_token(&self) -> Option<String>;

    fn has_token(&self) -> bool {
        self.load_token().is_some()
    }

    /// # Errors
    ///
    /// Returns an error if the token is blank or cannot be written.
    fn save_token(&self, token: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if an existing token cannot be removed.
    fn clear_token(&self) -> Result<()>;
}

/// Read-only access to the agent's own identity file.
pub trait IdentitySource {
    /// Never fails: a missing or malformed file yields an identity carrying
    /// only `fallback_name`.
    fn load_identity(&self, fallback_name: Option<&str>) -> NodeIdentity;
}

/// Append-only sink for node-activity log entries.
pub trait ActivityLog {
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    fn append(&self, entry: &str) -> Result<()>;
}

/// Everything the node orchestrator reads about the local installation.
pub trait NodeEnvironment: CliLocator + ConfigStore + TokenStore + IdentitySource + ActivityLog {}

/// Blanket implementation: any type implementing all sub-traits is a `NodeEnvironment`.
impl<T> NodeEnvironment for T where
    T: CliLocator + ConfigStore + TokenStore + IdentitySource + ActivityLog
{
}

// ── Process Discovery Port ────────────────────────────────────────────────────

/// Finds and terminates node agents running outside the managed service.
#[allow(async_fn_in_trait)]
pub trait ProcessDiscovery {
    /// PIDs of foreground node processes. Best-effort: failures and
    /// cancellation yield none.
    async fn find_foreground_node_pids(&self, cancel: &CancellationToken) -> Vec<u32>;
    /// Kill every foreground node process, returning how many were killed.
    /// Stops at the first kill attempted after `cancel` fires.
    async fn kill_foreground_node_processes(&self, cancel: &CancellationToken) -> usize;
}

// ── Approval Ports ────────────────────────────────────────────────────────────

/// Current exec approval policy, consulted on every submission.
pub trait PolicySource {
    fn current_policy(&self) -> ApprovalPolicy;
}

impl<F> PolicySource for F
where
    F: Fn() -> ApprovalPolicy,
{
    fn current_policy(&self) -> ApprovalPolicy {
        self()
    }
}

/// Append-only approval audit log.
pub trait ApprovalHistoryLog {
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    fn append(&self, entry: &ExecApprovalHistoryEntry) -> Result<()>;
    /// The last `max_entries` entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the log exists but cannot be read.
    fn read_recent(&self, max_entries: usize) -> Result<Vec<ExecApprovalHistoryEntry>>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

/// Silent reporter for callers without a progress display.
impl ProgressReporter for () {
    fn step(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}
