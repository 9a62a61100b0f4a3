//! `clawnode doctor` — check the local setup, then the node itself.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::{AppContext, exit_code};
use crate::application::ports::{CliLocator, ConfigStore, IdentitySource, TokenStore};
use crate::domain::exit_codes;
use crate::domain::health::{DoctorChecks, collect_issues};

/// Run the doctor command.
///
/// # Errors
///
/// Returns an error if the config path cannot be determined or JSON
/// serialization fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let env = app.node.environment();
    let config = env.load().ok();
    let configured = env.exists()
        && config
            .as_ref()
            .is_some_and(|c| !c.gateway.host.trim().is_empty());
    let identity = env.load_identity(config.as_ref().map(|c| c.display_name.as_str()));

    let checks = DoctorChecks {
        cli_path: env.find_cli(),
        config_path: env.path()?,
        configured,
        has_token: env.has_token(),
        node_id: identity.id,
        status: app.node.get_status(&app.cancel).await,
    };
    let issues = collect_issues(&checks);
    app.renderer().render_doctor(&checks, &issues)?;
    Ok(exit_code(exit_codes::for_status(&checks.status)))
}
