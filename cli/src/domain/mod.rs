//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod activity;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod gateway;
pub mod health;
pub mod identity;
pub mod process;
pub mod redact;
pub mod stabilizer;
pub mod status_parser;

pub use config::{CompanionConfig, EndpointHints, resolve_endpoint};
pub use error::{ApprovalError, ConfigError, NodeError};
pub use identity::NodeIdentity;
pub use stabilizer::StatusStabilizer;
