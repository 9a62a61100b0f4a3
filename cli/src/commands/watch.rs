//! `clawnode watch` — poll status and print stable transitions.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use clawnode_common::ConnectionState;
use tracing::{debug, warn};

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::domain::StatusStabilizer;

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between polls (default: `poll_interval_secs` from config)
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Stop after this many polls
    #[arg(long, value_name = "N")]
    pub count: Option<u64>,
}

/// Run the watch command until interrupted or `--count` polls are done.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub async fn run(app: &AppContext, args: &WatchArgs) -> Result<ExitCode> {
    let interval = Duration::from_secs(args.interval.unwrap_or_else(|| configured_interval(app)).max(1));
    let mut stabilizer = StatusStabilizer::default();
    let mut shown: Option<ConnectionState> = None;
    let mut polls = 0_u64;

    loop {
        let sample = app.node.get_status(&app.cancel).await;
        if app.cancel.is_cancelled() {
            break;
        }
        polls += 1;

        if sample.is_status_check_failed && stabilizer.current().is_some() {
            debug!("status check failed; keeping last good status");
        } else {
            let stable = stabilizer.stabilize(sample);
            let state = stable.connection_state();
            if shown != Some(state) {
                app.renderer().render_transition(stable)?;
                shown = Some(state);
            }
        }

        if args.count.is_some_and(|count| polls >= count) {
            break;
        }
        tokio::select! {
            () = app.cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn configured_interval(app: &AppContext) -> u64 {
    match app.node.environment().load() {
        Ok(config) => config.poll_interval_secs,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "failed to load config; using default poll interval");
            crate::domain::CompanionConfig::default().poll_interval_secs
        }
    }
}
