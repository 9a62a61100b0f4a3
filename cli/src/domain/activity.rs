//! Formatting of node-activity log entries.

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use clawnode_common::ProcessResult;

use crate::domain::redact::redact_secrets;

const SEPARATOR_WIDTH: usize = 64;

/// One activity-log block for an `openclaw` invocation, with secrets redacted
/// from the arguments and from both output streams.
#[must_use]
pub fn format_entry(at: DateTime<Local>, args: &[&str], result: &ProcessResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] openclaw {}",
        at.to_rfc3339(),
        redact_secrets(&args.join(" "))
    );
    for stream in [&result.stdout, &result.stderr] {
        if !stream.trim().is_empty() {
            let _ = writeln!(out, "{}", redact_secrets(stream.trim_end()));
        }
    }
    let _ = writeln!(out, "exit={} timeout={}", result.exit_code, result.timed_out);
    let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
    out
}
