use serde::{Deserialize, Serialize};

/// Outcome of one external command invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    /// Exit code, or `-1` when the process was killed or never ran.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ProcessResult {
    /// Result for a process that was killed after exceeding its timeout
    /// (or being cancelled).
    #[must_use]
    pub fn timed_out(stdout: String, stderr: String) -> Self {
        Self {
            exit_code: -1,
            stdout,
            stderr,
            timed_out: true,
        }
    }

    /// Result standing in for a process that could not be spawned.
    #[must_use]
    pub fn spawn_failed(message: impl Into<String>) -> Self {
        Self {
            exit_code: -1,
            stdout: String::new(),
            stderr: message.into(),
            timed_out: false,
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }

    /// Stdout if it has content, otherwise stderr.
    #[must_use]
    pub fn combined_output(&self) -> &str {
        if self.stdout.trim().is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }
}
