// src/engine/stdin.rs

//! Manual re-trigger: every line on stdin runs the build once more.
//!
//! Builds run inline in the foreground task. Unless the backend serializes
//! them, a stdin build may overlap a change-triggered build running in the
//! dispatcher.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::engine::BuildTrigger;
use crate::exec::BuildBackend;
use crate::report::Reporter;

/// How the stdin loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinExit {
    /// End of input (stdin closed or redirected from an exhausted file).
    Eof,
    /// Reading failed; the error has been logged.
    ReadError,
}

/// Read lines until EOF or an error, running one build per line.
///
/// Returns the number of builds run alongside the reason for stopping.
pub async fn run_stdin_loop<R, B>(
    mut reader: R,
    backend: &B,
    reporter: &Reporter,
    command: &str,
) -> (StdinExit, u64)
where
    R: AsyncBufRead + Unpin,
    B: BuildBackend,
{
    let mut builds = 0;
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => {
                info!(builds, "stdin closed; manual triggers disabled");
                return (StdinExit::Eof, builds);
            }
            Ok(_) if line.last() != Some(&b'\n') => {
                // Unterminated trailing text right before EOF.
                info!(builds, "stdin closed; manual triggers disabled");
                return (StdinExit::Eof, builds);
            }
            Ok(_) => {
                info!(trigger = ?BuildTrigger::Stdin, "manual rebuild requested");
                let outcome = backend.run_build(command).await;
                reporter.build_finished(&outcome);
                builds += 1;
            }
            Err(err) => {
                warn!(error = %err, "failed to read stdin; manual triggers disabled");
                return (StdinExit::ReadError, builds);
            }
        }
    }
}
