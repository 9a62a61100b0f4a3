//! `clawnode status` — one status snapshot, exit code mapped from it.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::{AppContext, exit_code};
use crate::domain::exit_codes;

/// Run the status command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let status = app.node.get_status(&app.cancel).await;
    app.renderer().render_status(&status)?;
    Ok(exit_code(exit_codes::for_status(&status)))
}
