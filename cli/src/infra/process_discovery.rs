//! Process-table scan for foreground node agents, via the platform's own
//! process tools.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::application::ports::{CommandRequest, CommandRunner, ProcessDiscovery};
use crate::domain::process::foreground_node_pids;

const SCAN_TIMEOUT: Duration = Duration::from_secs(5);

#[cfg(windows)]
const LIST_PROGRAM: &str = "powershell";
#[cfg(windows)]
const LIST_ARGS: &[&str] = &[
    "-NoProfile",
    "-Command",
    "Get-CimInstance Win32_Process | ForEach-Object { \"$($_.ProcessId) $($_.CommandLine)\" }",
];
#[cfg(not(windows))]
const LIST_PROGRAM: &str = "ps";
#[cfg(not(windows))]
const LIST_ARGS: &[&str] = &["-eo", "pid=,args="];

/// `ProcessDiscovery` backed by `ps`/`kill` (or PowerShell/`taskkill`).
#[derive(Debug, Clone, Default)]
pub struct SystemProcessDiscovery<R> {
    runner: R,
}

impl<R: CommandRunner> SystemProcessDiscovery<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn run(&self, program: &str, args: &[&str], cancel: &CancellationToken) -> Option<String> {
        let request = CommandRequest::new(program, args, SCAN_TIMEOUT);
        match self.runner.run(&request, cancel).await {
            Ok(result) if result.success() => Some(result.stdout),
            Ok(result) => {
                debug!(program, exit = result.exit_code, timed_out = result.timed_out, "process tool failed");
                None
            }
            Err(e) => {
                debug!(program, error = %format!("{e:#}"), "process tool unavailable");
                None
            }
        }
    }

    async fn kill(&self, pid: u32, cancel: &CancellationToken) -> bool {
        let pid = pid.to_string();
        #[cfg(windows)]
        let (program, args) = ("taskkill", ["/PID", pid.as_str(), "/T", "/F"]);
        #[cfg(not(windows))]
        let (program, args) = ("kill", ["-9", pid.as_str()]);
        self.run(program, &args, cancel).await.is_some()
    }
}

impl<R: CommandRunner> ProcessDiscovery for SystemProcessDiscovery<R> {
    async fn find_foreground_node_pids(&self, cancel: &CancellationToken) -> Vec<u32> {
        self.run(LIST_PROGRAM, LIST_ARGS, cancel)
            .await
            .map(|listing| foreground_node_pids(&listing, std::process::id()))
            .unwrap_or_default()
    }

    async fn kill_foreground_node_processes(&self, cancel: &CancellationToken) -> usize {
        let mut killed = 0;
        for pid in self.find_foreground_node_pids(cancel).await {
            if cancel.is_cancelled() {
                break;
            }
            if self.kill(pid, cancel).await {
                killed += 1;
            } else {
                warn!(pid, "failed to stop foreground node process");
            }
        }
        killed
    }
}
