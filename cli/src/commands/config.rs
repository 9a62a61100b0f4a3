//! `clawnode config` — show and set configuration values, store the token.

use std::io::Read as _;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::{ConfigStore, TokenStore};
use crate::domain::config::{validate_config_key, validate_config_value};

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (e.g. gateway.host)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Store or clear the gateway token
    Token {
        /// Token value, or `-` to read it from stdin
        #[arg(required_unless_present = "clear", conflicts_with = "clear")]
        value: Option<String>,
        /// Remove the stored token
        #[arg(long)]
        clear: bool,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the configuration or
/// token file cannot be read or written.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { key, value } => set_config(app, &key, &value),
        ConfigCommand::Token { value, clear } => set_token(app, value.as_deref(), clear),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let env = app.node.environment();
    let config = env.load()?;
    let path = env.path()?;
    app.renderer().render_config(&config, &path, env.has_token())?;
    Ok(ExitCode::SUCCESS)
}

fn set_config(app: &AppContext, key: &str, value: &str) -> Result<ExitCode> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;

    let env = app.node.environment();
    let mut config = env.load()?;
    config.apply_setting(key, value)?;
    env.save(&config)?;

    app.output.success(&format!("Set {key} = {value}"));
    Ok(ExitCode::SUCCESS)
}

fn set_token(app: &AppContext, value: Option<&str>, clear: bool) -> Result<ExitCode> {
    let env = app.node.environment();
    if clear {
        env.clear_token()?;
        app.output.success("Gateway token removed");
        return Ok(ExitCode::SUCCESS);
    }

    let token = match value {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read token from stdin")?;
            buf
        }
        Some(v) => v.to_string(),
        None => String::new(),
    };
    env.save_token(&token)?;
    app.output.success("Gateway token saved");
    Ok(ExitCode::SUCCESS)
}
