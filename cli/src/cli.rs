//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;

/// Lifecycle companion for the openclaw node agent
#[derive(Parser)]
#[command(
    name = "clawnode",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Log diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show node status
    Status,

    /// Install if needed, start the node and wait for the gateway
    Connect(commands::connect::ConnectArgs),

    /// Stop the node service and any foreground node
    Disconnect(commands::disconnect::DisconnectArgs),

    /// Connect if stopped, disconnect if running
    Toggle,

    /// Install the node service
    Install,

    /// Uninstall the node service
    Uninstall,

    /// Print stable status transitions as they happen
    Watch(commands::watch::WatchArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show recent openclaw invocations
    Logs(commands::logs::LogsArgs),

    /// Diagnose issues
    Doctor,

    /// Review exec approval requests
    #[command(subcommand)]
    Approvals(commands::approvals::ApprovalsCommand),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
        })?;

        let cancel = app.cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        match command {
            Command::Status => commands::status::run(&app).await,
            Command::Connect(args) => commands::connect::run(&app, &args).await,
            Command::Disconnect(args) => commands::disconnect::run(&app, &args).await,
            Command::Toggle => commands::toggle::run(&app).await,
            Command::Install => commands::install::install(&app).await,
            Command::Uninstall => commands::install::uninstall(&app).await,
            Command::Watch(args) => commands::watch::run(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Logs(args) => commands::logs::run(&app, &args).await,
            Command::Doctor => commands::doctor::run(&app).await,
            Command::Approvals(cmd) => commands::approvals::run(&app, cmd).await,
        }
    }
}
