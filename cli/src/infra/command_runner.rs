//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.

use std::process::Stdio;

use anyhow::{Context, Result};
use clawnode_common::ProcessResult;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::ports::{CommandRequest, CommandRunner};

/// Production `CommandRunner` — uses tokio for async process execution
/// with guaranteed timeout and kill on all platforms.
///
/// `tokio::time::timeout` around `.output().await` does not kill the child
/// when it fires on Windows; the future is dropped but the OS process keeps
/// running. This implementation races the child against the deadline and the
/// cancellation token with `tokio::select!` and calls `child.kill()` explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        request: &CommandRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<ProcessResult> {
        let program = request.program;
        if cancel.is_cancelled() {
            debug!(program, "cancelled before spawn");
            return Ok(ProcessResult::timed_out(String::new(), String::new()));
        }
        let mut command = tokio::process::Command::new(program);
        command
            .args(request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in request.env {
            command.env(key, value);
        }
        let mut child = command
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        // Output read so far survives a timeout; the readers hold these
        // buffers by reference and stop when the child is killed.
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let outcome = tokio::select! {
            (status, (), ()) = async {
                tokio::join!(
                    child.wait(),
                    drain(stdout_handle.as_mut(), &mut stdout),
                    drain(stderr_handle.as_mut(), &mut stderr),
                )
            } => Some(status),
            () = tokio::time::sleep(request.timeout) => None,
            () = cancel.cancelled() => None,
        };

        let Some(status) = outcome else {
            if let Err(e) = child.kill().await {
                debug!(error = %e, program, "failed to kill timed-out child");
            }
            debug!(program, timeout_secs = request.timeout.as_secs(), "command timed out");
            return Ok(ProcessResult::timed_out(lossy(&stdout), lossy(&stderr)));
        };
        let status = status.with_context(|| format!("waiting for {program}"))?;

        Ok(ProcessResult {
            exit_code: status.code().unwrap_or(-1),
            stdout: lossy(&stdout),
            stderr: lossy(&stderr),
            timed_out: false,
        })
    }
}

async fn drain<R: AsyncRead + Unpin>(handle: Option<&mut R>, buf: &mut Vec<u8>) {
    if let Some(h) = handle {
        let _ = h.read_to_end(buf).await;
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
