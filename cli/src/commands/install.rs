//! `clawnode install` / `clawnode uninstall` — pass-through to the CLI.

use std::process::ExitCode;

use anyhow::Result;
use clawnode_common::ProcessResult;

use crate::app::AppContext;

/// Run `openclaw node install` with the configured gateway.
///
/// # Errors
///
/// Returns an error if the CLI or the gateway configuration is missing, or
/// the CLI cannot be executed.
pub async fn install(app: &AppContext) -> Result<ExitCode> {
    let result = app.node.install(&app.cancel).await?;
    finish(app, "Install", &result)
}

/// Run `openclaw node uninstall`.
///
/// # Errors
///
/// Returns an error if the CLI is missing or cannot be executed.
pub async fn uninstall(app: &AppContext) -> Result<ExitCode> {
    let result = app.node.uninstall(&app.cancel).await?;
    finish(app, "Uninstall", &result)
}

fn finish(app: &AppContext, action: &str, result: &ProcessResult) -> Result<ExitCode> {
    app.renderer().render_process_result(action, result)?;
    Ok(if result.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
