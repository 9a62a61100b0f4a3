//! Integration tests for the clawnode binary
//!
//! These tests spawn the actual binary against a fake `openclaw` script and
//! a temporary clawnode home. The fake script is a POSIX shell script, so
//! everything beyond argument parsing is unix-only.

mod cli_tests;
#[cfg(unix)]
mod approvals_command;
#[cfg(unix)]
mod config_command;
#[cfg(unix)]
mod node_commands;
