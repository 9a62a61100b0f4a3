//! clawnode - lifecycle companion for the openclaw node agent

use std::process::ExitCode;

use clap::Parser;
use clawnode_cli::cli::Cli;
use clawnode_cli::output::json::format_error;
use tracing_subscriber::EnvFilter;

/// Overrides the diagnostic log filter (e.g. `clawnode_cli=debug`).
const LOG_ENV: &str = "CLAWNODE_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            match format_error(&format!("{e:#}"), "error") {
                Ok(body) if json => println!("{body}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
