//! Command implementations

pub mod approvals;
pub mod config;
pub mod connect;
pub mod disconnect;
pub mod doctor;
pub mod install;
pub mod logs;
pub mod status;
pub mod toggle;
pub mod watch;
