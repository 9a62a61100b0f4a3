//! `GetStatus`: reconcile CLI output, the process table and the gateway.

use std::path::Path;

use clawnode_common::{NodeIssue, NodeStatus};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::NodeService;
use crate::application::ports::{CommandRunner, NodeEnvironment, ProcessDiscovery};
use crate::domain::config::resolve_endpoint;
use crate::domain::gateway::{GatewayProbe, classify_probe};
use crate::domain::identity::NodeIdentity;
use crate::domain::status_parser;

impl<R, D, E> NodeService<R, D, E>
where
    R: CommandRunner,
    D: ProcessDiscovery,
    E: NodeEnvironment,
{
    /// Determine the node's current status. Never fails.
    ///
    /// A timed-out `node status` call sets `is_status_check_failed` and is not
    /// otherwise interpreted; callers should keep showing their last good
    /// status in that case.
    pub async fn get_status(&self, cancel: &CancellationToken) -> NodeStatus {
        let Some(cli) = self.locate() else {
            return NodeStatus::agent_missing();
        };
        self.status_with(&cli, cancel).await
    }

    pub(super) async fn status_with(&self, cli: &Path, cancel: &CancellationToken) -> NodeStatus {
        let mut status = NodeStatus {
            is_agent_available: true,
            ..NodeStatus::default()
        };

        let config_exists = self.env.exists();
        let config = self.load_config();
        let identity = self.env.load_identity(Some(&config.display_name));
        let endpoint = resolve_endpoint(&config.endpoint_hints(), &identity.endpoint_hints());

        if endpoint.host.is_some() {
            status.gateway_host.clone_from(&endpoint.host);
            status.gateway_port = endpoint.port;
        }
        status.node_id.clone_from(&identity.id);
        status.display_name.clone_from(&identity.display_name);

        if !config_exists && endpoint.host.is_none() {
            status.issue = NodeIssue::ConfigMissing;
        }
        let token = self.env.load_token();
        if token.is_none() && !status.issue.is_some() {
            status.issue = NodeIssue::TokenMissing;
        }

        let result = self
            .invoke_lenient(cli, &["node", "status", "--json"], self.timeouts.status, cancel)
            .await;
        status_parser::merge_into(&mut status, status_parser::parse_cli_output(result.combined_output()));

        if result.timed_out {
            status.is_status_check_failed = true;
            status.set_error_if_empty("Status check timed out.");
        }

        if !self.discovery.find_foreground_node_pids(cancel).await.is_empty() {
            status.has_foreground_process = true;
            status.is_running = true;
        }

        if status.is_running && !status.is_connected {
            if let Some(url) = endpoint.url() {
                let probe = self
                    .probe_gateway(cli, &url, token.as_deref(), &identity, cancel)
                    .await;
                apply_probe(&mut status, &probe, token.is_some());
            }
        }

        // Pairing and token problems only matter while the node tries to run.
        if !status.is_running
            && matches!(status.issue, NodeIssue::PairingRequired | NodeIssue::TokenInvalid)
        {
            status.issue = NodeIssue::None;
            status.last_error = None;
        }

        if result.exit_code != 0 && !result.timed_out && !status.issue.is_some() {
            status.issue = NodeIssue::UnknownError;
            let stderr = result.stderr.trim();
            status.set_error_if_empty(if stderr.is_empty() {
                "openclaw status failed."
            } else {
                stderr
            });
        }

        debug!(
            state = %status.connection_state(),
            issue = ?status.issue,
            foreground = status.has_foreground_process,
            "node status"
        );
        status
    }

    /// Ask the gateway whether this node is in its connected set.
    async fn probe_gateway(
        &self,
        cli: &Path,
        url: &str,
        token: Option<&str>,
        identity: &NodeIdentity,
        cancel: &CancellationToken,
    ) -> GatewayProbe {
        let mut args = vec!["nodes", "status", "--connected", "--json", "--url", url];
        if let Some(token) = token {
            args.extend(["--token", token]);
        }
        let result = self
            .invoke_lenient(cli, &args, self.timeouts.status, cancel)
            .await;
        classify_probe(&result, identity)
    }
}

fn apply_probe(status: &mut NodeStatus, probe: &GatewayProbe, has_token: bool) {
    if let Some(connected) = probe.connected {
        status.is_connected = connected;
    }
    match probe.issue {
        Some(issue) if !status.issue.is_some() => {
            status.issue = issue;
            if let Some(message) = probe.message {
                status.set_error_if_empty(message);
            }
        }
        _ if probe.connected.is_none() && !has_token && !status.issue.is_some() => {
            status.issue = NodeIssue::TokenMissing;
            status.set_error_if_empty("Gateway token required to verify connection.");
        }
        _ => {}
    }
}
