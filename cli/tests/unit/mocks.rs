//! Hand-written fakes for every port the services depend on.

#![allow(clippy::expect_used, clippy::unwrap_used, dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use clawnode_cli::application::ports::{
    ActivityLog, CliLocator, CommandRequest, CommandRunner, ConfigStore, IdentitySource,
    ProcessDiscovery, ProgressReporter, TokenStore,
};
use clawnode_cli::domain::{CompanionConfig, NodeIdentity};
use clawnode_common::ProcessResult;
use tokio_util::sync::CancellationToken;

// ── Process results ───────────────────────────────────────────────────────────

pub fn ok(stdout: &str) -> ProcessResult {
    ProcessResult {
        exit_code: 0,
        stdout: stdout.to_string(),
        ..ProcessResult::default()
    }
}

pub fn failed(exit_code: i32, stderr: &str) -> ProcessResult {
    ProcessResult {
        exit_code,
        stderr: stderr.to_string(),
        ..ProcessResult::default()
    }
}

pub fn timed_out() -> ProcessResult {
    ProcessResult::timed_out(String::new(), String::new())
}

// ── Command runner ────────────────────────────────────────────────────────────

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl Call {
    pub fn command(&self) -> String {
        key(&self.args)
    }
}

fn key<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .take(2)
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scripted runner keyed by the first two arguments (`"node status"`,
/// `"nodes status"`, ...). Each script is consumed front to back and its
/// last response repeats. Unscripted commands succeed with empty output.
#[derive(Default)]
pub struct FakeRunner {
    scripts: Mutex<HashMap<String, VecDeque<Result<ProcessResult, String>>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on(self, command: &str, result: ProcessResult) -> Self {
        self.push(command, Ok(result));
        self
    }

    #[must_use]
    pub fn spawn_error(self, command: &str, message: &str) -> Self {
        self.push(command, Err(message.to_string()));
        self
    }

    fn push(&self, command: &str, response: Result<ProcessResult, String>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.calls().iter().filter(|c| c.command() == command).count()
    }

    pub fn find(&self, command: &str) -> Option<Call> {
        self.calls().into_iter().find(|c| c.command() == command)
    }
}

impl CommandRunner for &FakeRunner {
    async fn run(
        &self,
        request: &CommandRequest<'_>,
        _cancel: &CancellationToken,
    ) -> Result<ProcessResult> {
        self.calls.lock().unwrap().push(Call {
            program: request.program.to_string(),
            args: request.args.iter().map(|a| (*a).to_string()).collect(),
            env: request
                .env
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        });

        let mut scripts = self.scripts.lock().unwrap();
        let response = match scripts.get_mut(&key(request.args)) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match response {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => anyhow::bail!("{message}"),
            None => Ok(ok("")),
        }
    }
}

// ── Process discovery ─────────────────────────────────────────────────────────

/// Foreground processes that disappear once killed.
#[derive(Default)]
pub struct FakeDiscovery {
    pids: Mutex<Vec<u32>>,
    kill_calls: AtomicUsize,
}

impl FakeDiscovery {
    pub fn with_pids(pids: &[u32]) -> Self {
        Self {
            pids: Mutex::new(pids.to_vec()),
            kill_calls: AtomicUsize::new(0),
        }
    }

    pub fn kill_calls(&self) -> usize {
        self.kill_calls.load(Ordering::SeqCst)
    }
}

impl ProcessDiscovery for &FakeDiscovery {
    async fn find_foreground_node_pids(&self, _cancel: &CancellationToken) -> Vec<u32> {
        self.pids.lock().unwrap().clone()
    }

    async fn kill_foreground_node_processes(&self, _cancel: &CancellationToken) -> usize {
        self.kill_calls.fetch_add(1, Ordering::SeqCst);
        let mut pids = self.pids.lock().unwrap();
        let killed = pids.len();
        pids.clear();
        killed
    }
}

// ── Node environment ──────────────────────────────────────────────────────────

/// In-memory CLI location, config, token, identity and activity log.
pub struct FakeEnv {
    pub cli: Option<PathBuf>,
    pub config: Mutex<Option<CompanionConfig>>,
    pub token: Mutex<Option<String>>,
    pub identity: NodeIdentity,
    pub activity: Mutex<Vec<String>>,
}

impl FakeEnv {
    /// CLI present, gateway `gw.example:443` over TLS, token stored, and an
    /// identity with id `node-abc`.
    pub fn configured() -> Self {
        let mut config = CompanionConfig::default();
        config.gateway.host = "gw.example".to_string();
        config.display_name = "desk".to_string();
        Self {
            cli: Some(PathBuf::from("/usr/local/bin/openclaw")),
            config: Mutex::new(Some(config)),
            token: Mutex::new(Some("s3cret".to_string())),
            identity: NodeIdentity {
                id: Some("node-abc".to_string()),
                display_name: Some("desk".to_string()),
                ..NodeIdentity::default()
            },
            activity: Mutex::new(Vec::new()),
        }
    }

    pub fn without_cli(mut self) -> Self {
        self.cli = None;
        self
    }

    pub fn without_config(self) -> Self {
        *self.config.lock().unwrap() = None;
        self
    }

    pub fn without_token(self) -> Self {
        *self.token.lock().unwrap() = None;
        self
    }

    pub fn with_identity(mut self, identity: NodeIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn activity(&self) -> Vec<String> {
        self.activity.lock().unwrap().clone()
    }
}

impl CliLocator for FakeEnv {
    fn find_cli(&self) -> Option<PathBuf> {
        self.cli.clone()
    }
}

impl ConfigStore for FakeEnv {
    fn exists(&self) -> bool {
        self.config.lock().unwrap().is_some()
    }

    fn load(&self) -> Result<CompanionConfig> {
        Ok(self.config.lock().unwrap().clone().unwrap_or_default())
    }

    fn save(&self, config: &CompanionConfig) -> Result<()> {
        *self.config.lock().unwrap() = Some(config.clone());
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/fake/config.yaml"))
    }
}

impl TokenStore for FakeEnv {
    fn load_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn save_token(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

impl IdentitySource for FakeEnv {
    fn load_identity(&self, _fallback_name: Option<&str>) -> NodeIdentity {
        self.identity.clone()
    }
}

impl ActivityLog for FakeEnv {
    fn append(&self, entry: &str) -> Result<()> {
        self.activity.lock().unwrap().push(entry.to_string());
        Ok(())
    }
}

// ── Progress reporter ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Step(String),
    Success(String),
    Warn(String),
}

#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Progress>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<Progress> {
        self.events.lock().unwrap().clone()
    }

    pub fn steps(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Progress::Step(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.lock().unwrap().push(Progress::Step(message.to_string()));
    }

    fn success(&self, message: &str) {
        self.events.lock().unwrap().push(Progress::Success(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.events.lock().unwrap().push(Progress::Warn(message.to_string()));
    }
}
