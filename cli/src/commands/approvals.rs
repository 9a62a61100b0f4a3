//! `clawnode approvals` — exec approval policy, review and history.

use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use clawnode_common::{ExecApprovalHistoryEntry, ExecApprovalRequest};

use crate::app::AppContext;
use crate::application::services::approval::{ApprovalEvent, SubmitOutcome};
use crate::output::human::command_line;

/// Approvals subcommands.
#[derive(Subcommand)]
pub enum ApprovalsCommand {
    /// Print the current approval policy
    Policy,
    /// Submit requests from a JSON-lines file and resolve pending ones
    Review(ReviewArgs),
    /// Show recent approval decisions
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        lines: usize,
    },
}

/// Arguments for `approvals review`.
#[derive(Args)]
pub struct ReviewArgs {
    /// JSON-lines file of requests, or `-` for stdin
    pub file: PathBuf,

    /// Approve every pending request without prompting
    #[arg(long, conflicts_with = "deny_all")]
    pub yes: bool,

    /// Deny every pending request without prompting
    #[arg(long)]
    pub deny_all: bool,
}

/// Run the approvals command.
///
/// # Errors
///
/// Returns an error if the request file or history cannot be read, or a
/// prompt fails.
pub async fn run(app: &AppContext, cmd: ApprovalsCommand) -> Result<ExitCode> {
    match cmd {
        ApprovalsCommand::Policy => {
            app.renderer().render_policy(app.approvals().policy())?;
        }
        ApprovalsCommand::Review(args) => review(app, &args).await?,
        ApprovalsCommand::History { lines } => {
            let entries = app.approvals().history(lines)?;
            app.renderer().render_history(&entries)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn review(app: &AppContext, args: &ReviewArgs) -> Result<()> {
    let content = read_requests(&args.file).await?;
    let service = app.approvals();
    let mut events = service.subscribe();
    let mut decided = 0_usize;

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let request: ExecApprovalRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                app.output
                    .warn(&format!("Skipping line {}: {e}", index + 1));
                continue;
            }
        };
        match service.submit(request) {
            Ok(SubmitOutcome::Decided(_)) => decided += 1,
            Ok(SubmitOutcome::Queued) => {}
            Ok(SubmitOutcome::AlreadyPending) => {
                app.output
                    .warn(&format!("Skipping line {}: duplicate request id", index + 1));
            }
            Err(e) => app.output.warn(&format!("Skipping line {}: {e}", index + 1)),
        }
    }

    while let Ok(event) = events.try_recv() {
        if let ApprovalEvent::Requested(request) = event {
            app.output.info(&format!(
                "Pending: {}",
                command_line(&request.command, &request.arguments)
            ));
        }
    }

    for request in service.pending() {
        let approve = if args.yes {
            true
        } else if args.deny_all {
            false
        } else {
            app.confirm(&prompt(&request), false)?
        };
        let resolved = if approve {
            service.try_approve(&request.id)
        } else {
            service.try_deny(&request.id)
        };
        if resolved {
            decided += 1;
        }
    }

    if decided == 0 && !app.is_json() {
        app.output.info("No requests were decided");
        return Ok(());
    }
    let entries: Vec<ExecApprovalHistoryEntry> = service.history(decided)?;
    app.renderer().render_history(&entries)?;
    Ok(())
}

fn prompt(request: &ExecApprovalRequest) -> String {
    let mut text = format!("Allow `{}`", command_line(&request.command, &request.arguments));
    if let Some(by) = &request.requested_by {
        text.push_str(&format!(" requested by {by}"));
    }
    if let Some(reason) = &request.reason {
        text.push_str(&format!(" ({reason})"));
    }
    text.push('?');
    text
}

async fn read_requests(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        return tokio::task::spawn_blocking(|| -> Result<String> {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read requests from stdin")?;
            Ok(buf)
        })
        .await
        .context("stdin reader panicked")?;
    }
    tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))
}
