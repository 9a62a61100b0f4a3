//! Connect and disconnect with bounded polling.

use std::path::Path;
use std::time::Duration;

use clawnode_common::NodeStatus;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{NodeService, install_args};
use crate::application::ports::{CommandRunner, NodeEnvironment, ProcessDiscovery, ProgressReporter};

impl<R, D, E> NodeService<R, D, E>
where
    R: CommandRunner,
    D: ProcessDiscovery,
    E: NodeEnvironment,
{
    /// Install the node service if needed, restart it, and wait until it is
    /// running and connected (default 30s). Returns the last observed status.
    pub async fn connect(
        &self,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
        progress: &impl ProgressReporter,
    ) -> NodeStatus {
        progress.step("Checking openclaw status...");
        let Some(cli) = self.locate() else {
            return NodeStatus::agent_missing();
        };
        let Some(config) = self.configured() else {
            return NodeStatus::config_missing();
        };

        let current = self.status_with(&cli, cancel).await;
        if cancel.is_cancelled() {
            return current;
        }
        if !current.is_installed {
            progress.step("Installing node service...");
            let args = install_args(&config);
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            self.invoke_lenient(&cli, &args, self.timeouts.command, cancel)
                .await;
        }

        if cancel.is_cancelled() {
            return self.status_with(&cli, cancel).await;
        }
        progress.step("Restarting node service...");
        self.invoke_lenient(&cli, &["node", "restart", "--json"], self.timeouts.command, cancel)
            .await;

        progress.step("Waiting for connection...");
        let status = self
            .wait_until(
                &cli,
                timeout.unwrap_or(self.timeouts.connect),
                cancel,
                progress,
                |s| s.is_running && s.is_connected,
                |s| {
                    if s.is_running {
                        "Waiting for gateway connection"
                    } else {
                        "Waiting for node start"
                    }
                },
            )
            .await;

        if status.is_running && status.is_connected {
            info!("node connected");
            progress.success("Node connected");
        } else {
            progress.warn("Node did not connect before the timeout");
        }
        status
    }

    /// Stop the node service, wait until it is no longer running (default
    /// 20s), then kill any foreground node process left behind.
    ///
    /// Once `cancel` fires no further CLI call or kill is issued.
    pub async fn disconnect(
        &self,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
        progress: &impl ProgressReporter,
    ) -> NodeStatus {
        progress.step("Stopping node service...");
        let Some(cli) = self.locate() else {
            return NodeStatus::agent_missing();
        };

        if cancel.is_cancelled() {
            return self.status_with(&cli, cancel).await;
        }
        self.invoke_lenient(&cli, &["node", "stop", "--json"], self.timeouts.command, cancel)
            .await;

        progress.step("Waiting for shutdown...");
        let status = self
            .wait_until(
                &cli,
                timeout.unwrap_or(self.timeouts.disconnect),
                cancel,
                progress,
                |s| !s.is_running,
                |_| "Waiting for node shutdown",
            )
            .await;

        if cancel.is_cancelled() {
            return status;
        }
        progress.step("Closing foreground node...");
        let killed = self.discovery.kill_foreground_node_processes(cancel).await;
        if killed > 0 {
            warn!(killed, "stopped foreground openclaw node processes");
            progress.warn(&format!("Stopped {killed} foreground node process(es)"));
        }

        if !status.is_running {
            info!("node stopped");
            progress.success("Node stopped");
        }
        status
    }

    /// Poll status once per interval until `done` holds, the timeout elapses
    /// or `cancel` fires. Always polls at least once.
    ///
    /// A poll whose status check failed never replaces an earlier good
    /// sample and never satisfies `done`.
    async fn wait_until(
        &self,
        cli: &Path,
        timeout: Duration,
        cancel: &CancellationToken,
        progress: &impl ProgressReporter,
        done: impl Fn(&NodeStatus) -> bool,
        phase: impl Fn(&NodeStatus) -> &'static str,
    ) -> NodeStatus {
        let start = Instant::now();
        let mut last = self.status_with(cli, cancel).await;

        loop {
            let elapsed = start.elapsed().as_secs();
            progress.step(&format!("{}... ({elapsed}s)", phase(&last)));
            if !last.is_status_check_failed && done(&last) {
                return last;
            }
            if cancel.is_cancelled() || start.elapsed() >= timeout {
                return last;
            }

            tokio::select! {
                () = cancel.cancelled() => return last,
                () = tokio::time::sleep(self.timeouts.poll_interval) => {}
            }

            let next = self.status_with(cli, cancel).await;
            if !next.is_status_check_failed || last.is_status_check_failed {
                last = next;
            }
        }
    }
}
