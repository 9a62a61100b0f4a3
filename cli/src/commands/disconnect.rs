//! `clawnode disconnect` — stop the service and any foreground node.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::{AppContext, exit_code};
use crate::domain::exit_codes;
use crate::output::TerminalReporter;

/// Arguments for the disconnect command.
#[derive(Args)]
pub struct DisconnectArgs {
    /// Seconds to wait for the node to stop
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Run the disconnect command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub async fn run(app: &AppContext, args: &DisconnectArgs) -> Result<ExitCode> {
    let reporter = TerminalReporter::new(&app.output);
    let status = app
        .node
        .disconnect(args.timeout.map(Duration::from_secs), &app.cancel, &reporter)
        .await;
    drop(reporter);
    app.renderer().render_status(&status)?;
    Ok(exit_code(exit_codes::for_status(&status)))
}
