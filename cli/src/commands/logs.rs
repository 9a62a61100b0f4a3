//! `clawnode logs` — tail the node-activity log.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;

/// How often follow mode checks the log for new lines.
const FOLLOW_INTERVAL: Duration = Duration::from_millis(500);

/// Arguments for the logs command.
#[derive(Args)]
pub struct LogsArgs {
    /// Number of lines to show
    #[arg(short = 'n', long, default_value_t = 50)]
    pub lines: usize,

    /// Keep printing lines as they are appended (Ctrl-C to stop)
    #[arg(short = 'f', long, visible_alias = "tail")]
    pub follow: bool,
}

/// Run the logs command. Exits 1 if nothing has been logged yet.
///
/// # Errors
///
/// Returns an error if the log exists but cannot be read.
pub async fn run(app: &AppContext, args: &LogsArgs) -> Result<ExitCode> {
    let log = &app.node.environment().activity;
    let mut follower = log.follow();
    let Some(lines) = log.tail(args.lines)? else {
        app.output
            .error(&format!("No activity log yet ({})", log.path().display()));
        return Ok(ExitCode::FAILURE);
    };
    app.renderer().render_log_lines(&lines)?;

    if !args.follow {
        return Ok(ExitCode::SUCCESS);
    }
    loop {
        tokio::select! {
            () = app.cancel.cancelled() => break,
            () = tokio::time::sleep(FOLLOW_INTERVAL) => {}
        }
        let appended = follower.poll()?;
        if !appended.is_empty() {
            app.renderer().render_log_lines(&appended)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
