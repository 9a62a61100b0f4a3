//! `clawnode toggle` — disconnect a running node, connect a stopped one.

use std::process::ExitCode;

use anyhow::Result;
use clawnode_common::NodeIssue;

use crate::app::{AppContext, exit_code};
use crate::domain::exit_codes;
use crate::output::TerminalReporter;

/// Run the toggle command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let current = app.node.get_status(&app.cancel).await;
    if current.issue == NodeIssue::AgentMissing {
        app.renderer().render_status(&current)?;
        return Ok(exit_code(exit_codes::for_status(&current)));
    }

    let reporter = TerminalReporter::new(&app.output);
    let status = if current.is_running {
        app.node.disconnect(None, &app.cancel, &reporter).await
    } else {
        app.node.connect(None, &app.cancel, &reporter).await
    };
    drop(reporter);
    app.renderer().render_status(&status)?;
    Ok(exit_code(exit_codes::for_status(&status)))
}
