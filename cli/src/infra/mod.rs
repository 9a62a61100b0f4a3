//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, process
//! discovery, and filesystem access for config, token, identity and logs.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod activity_log;
pub mod approval_history;
pub mod cli_locator;
pub mod command_runner;
pub mod config;
pub mod environment;
pub mod identity;
pub mod paths;
pub mod process_discovery;
pub mod token;
