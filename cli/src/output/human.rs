//! Human-readable terminal renderer.

use std::path::Path;

use chrono::Local;
use clawnode_common::{
    ApprovalDecision, ApprovalPolicy, ExecApprovalHistoryEntry, NodeIssue, NodeStatus,
    ProcessResult,
};
use owo_colors::OwoColorize as _;

use crate::domain::config::CompanionConfig;
use crate::domain::health::DoctorChecks;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render a full status snapshot.
    pub fn render_status(&self, status: &NodeStatus) {
        if self.ctx.quiet {
            return;
        }
        let state = status.connection_state();
        println!(
            "  {:<14} {}",
            "State:".style(self.ctx.styles.dim),
            state.style(self.ctx.styles.for_state(state))
        );
        self.ctx.kv("Installed:", yes_no(status.is_installed));
        self.ctx.kv("Running:", yes_no(status.is_running));
        self.ctx.kv("Connected:", yes_no(status.is_connected));
        if status.has_foreground_process {
            self.ctx.kv("Foreground:", "yes (running outside the service)");
        }
        if let Some(gateway) = format_gateway(status.gateway_host.as_deref(), status.gateway_port) {
            self.ctx.kv("Gateway:", &gateway);
        }
        if let Some(name) = &status.display_name {
            self.ctx.kv("Name:", name);
        }
        if let Some(id) = &status.node_id {
            self.ctx.kv("Node id:", id);
        }
        if let Some(at) = status.last_connected_at {
            self.ctx
                .kv("Last seen:", &at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string());
        }
        if status.is_status_check_failed {
            self.ctx.warn("Status check timed out; values may be stale");
        }
        if status.issue.is_some() {
            println!();
            self.ctx.warn(issue_display(status.issue));
            if let Some(hint) = issue_hint(status.issue) {
                self.ctx.info(hint);
            }
        }
        if let Some(error) = status.last_error.as_deref().filter(|e| !e.trim().is_empty()) {
            self.ctx.kv("Last error:", error);
        }
    }

    /// Render one stable state transition observed by `watch`.
    pub fn render_transition(&self, status: &NodeStatus) {
        if self.ctx.quiet {
            return;
        }
        let state = status.connection_state();
        let mut line = format!(
            "[{}] {}",
            Local::now().format("%H:%M:%S"),
            state.style(self.ctx.styles.for_state(state))
        );
        if let Some(gateway) = format_gateway(status.gateway_host.as_deref(), status.gateway_port) {
            line.push_str(&format!(" {gateway}"));
        }
        if status.issue.is_some() {
            line.push_str(&format!(" ({})", issue_display(status.issue)));
        }
        println!("{line}");
    }

    /// Render the effective configuration.
    pub fn render_config(&self, config: &CompanionConfig, path: &Path, has_token: bool) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        let host = if config.gateway.host.trim().is_empty() {
            "(not set)"
        } else {
            config.gateway.host.as_str()
        };
        println!("  {:<26} {host}", "gateway.host:");
        println!("  {:<26} {}", "gateway.port:", config.gateway.port);
        println!("  {:<26} {}", "gateway.tls:", config.gateway.tls);
        println!(
            "  {:<26} {}",
            "gateway.tls_fingerprint:",
            config.gateway.tls_fingerprint.as_deref().unwrap_or("(not set)")
        );
        println!("  {:<26} {}", "display_name:", config.display_name);
        println!("  {:<26} {}", "approvals.policy:", config.approvals.policy);
        println!("  {:<26} {}", "poll_interval_secs:", config.poll_interval_secs);
        println!();
        println!(
            "  {:<26} {}",
            "token:",
            if has_token { "stored" } else { "(not set)" }
        );
        println!();
    }

    /// Render doctor results followed by the status they were based on.
    pub fn render_doctor(&self, checks: &DoctorChecks, issues: &[String]) {
        println!();
        println!("  {}", "clawnode health check".style(self.ctx.styles.header));
        println!();

        println!("  Local setup:");
        match &checks.cli_path {
            Some(path) => self.print_check(true, &format!("openclaw CLI at {}", path.display())),
            None => self.print_check(false, "openclaw CLI not found"),
        }
        self.print_check(
            checks.configured,
            &format!("gateway configured in {}", checks.config_path.display()),
        );
        self.print_check(checks.has_token, "gateway token stored");
        match &checks.node_id {
            Some(id) => self.print_check(true, &format!("node identity {id}")),
            None => self.print_check(false, "node identity"),
        }
        println!();

        println!("  Node:");
        self.render_status(&checks.status);

        println!();
        if issues.is_empty() {
            println!("  {} Everything looks good!", "✓".style(self.ctx.styles.success));
        } else {
            println!(
                "  {} Found {} issue(s):",
                "✗".style(self.ctx.styles.error),
                issues.len()
            );
            for issue in issues {
                println!("    {} {issue}", "✗".style(self.ctx.styles.error));
            }
        }
        println!();
    }

    /// Print activity-log lines verbatim.
    pub fn render_log_lines(&self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }

    /// Render the outcome of a pass-through CLI call.
    pub fn render_process_result(&self, action: &str, result: &ProcessResult) {
        let output = result.combined_output().trim();
        if !output.is_empty() && !self.ctx.quiet {
            println!("{output}");
        }
        if result.success() {
            self.ctx.success(&format!("{action} succeeded"));
        } else if result.timed_out {
            self.ctx.error(&format!("{action} timed out"));
        } else {
            self.ctx
                .error(&format!("{action} failed (exit {})", result.exit_code));
        }
    }

    pub fn render_policy(&self, policy: ApprovalPolicy) {
        println!("{policy}");
    }

    /// Render approval history, oldest first.
    pub fn render_history(&self, entries: &[ExecApprovalHistoryEntry]) {
        if entries.is_empty() {
            if !self.ctx.quiet {
                println!("No approval history.");
            }
            return;
        }
        for entry in entries {
            let decision = match entry.decision {
                ApprovalDecision::Approved => "approved".style(self.ctx.styles.success).to_string(),
                ApprovalDecision::Denied => "denied".style(self.ctx.styles.error).to_string(),
            };
            println!(
                "  {}  {:<8}  {:<6}  {}",
                entry
                    .decided_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S"),
                decision,
                entry.policy,
                command_line(&entry.command, &entry.arguments),
            );
        }
    }
}

// ── Display helpers ──────────────────────────────────────────────────────────

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// `host:port`, or just the host when no port is known.
#[must_use]
pub fn format_gateway(host: Option<&str>, port: Option<u16>) -> Option<String> {
    let host = host.filter(|h| !h.trim().is_empty())?;
    Some(match port {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// The command and its arguments as one line.
#[must_use]
pub fn command_line(command: &str, arguments: &str) -> String {
    if arguments.trim().is_empty() {
        command.to_string()
    } else {
        format!("{command} {arguments}")
    }
}

#[must_use]
pub fn issue_display(issue: NodeIssue) -> &'static str {
    match issue {
        NodeIssue::None => "No issues",
        NodeIssue::AgentMissing => "openclaw CLI not found",
        NodeIssue::ConfigMissing => "Gateway not configured",
        NodeIssue::TokenMissing => "Gateway token missing",
        NodeIssue::TokenInvalid => "Gateway token rejected",
        NodeIssue::PairingRequired => "Pairing required",
        NodeIssue::GatewayUnreachable => "Gateway unreachable",
        NodeIssue::UnknownError => "Node reported an error",
    }
}

fn issue_hint(issue: NodeIssue) -> Option<&'static str> {
    match issue {
        NodeIssue::AgentMissing => Some("Install openclaw or set OPENCLAW_CLI_PATH"),
        NodeIssue::ConfigMissing => Some("Run: clawnode config set gateway.host <host>"),
        NodeIssue::TokenMissing | NodeIssue::TokenInvalid => {
            Some("Run: clawnode config token <token>")
        }
        NodeIssue::PairingRequired => Some("Approve this node on the gateway, then reconnect"),
        NodeIssue::GatewayUnreachable => Some("Check the gateway host, port and network"),
        NodeIssue::None | NodeIssue::UnknownError => None,
    }
}

impl HumanRenderer<'_> {
    fn print_check(&self, ok: bool, msg: &str) {
        if ok {
            println!("    {} {msg}", "✓".style(self.ctx.styles.success));
        } else {
            println!("    {} {msg}", "✗".style(self.ctx.styles.error));
        }
    }
}
