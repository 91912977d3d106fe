// src/exec/backend.rs

//! Pluggable build backend abstraction.
//!
//! The dispatcher and the stdin loop talk to a `BuildBackend` instead of
//! spawning processes directly. This makes it easy to swap in a fake
//! backend in tests while keeping the production implementation in
//! [`super::command`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::exec::command::run_shell;
use crate::exec::BuildOutcome;

/// Trait abstracting how the build command is executed.
///
/// Implementations never fail: problems starting the command are reported
/// as a failed [`BuildOutcome`] so the watch loop keeps going.
pub trait BuildBackend: Send + Sync {
    /// Run `command` to completion.
    fn run_build<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + 'a>>;
}

/// Real backend used in production: `sh -c <command>`.
///
/// Cloning shares the optional serialization gate, so every clone handed to
/// a trigger source waits on the same slot.
#[derive(Debug, Clone, Default)]
pub struct ShellBackend {
    gate: Option<Arc<Mutex<()>>>,
}

impl ShellBackend {
    /// `serialize = true` allows at most one build at a time across all
    /// clones.
    pub fn new(serialize: bool) -> Self {
        Self {
            gate: serialize.then(|| Arc::new(Mutex::new(()))),
        }
    }
}

impl BuildBackend for ShellBackend {
    fn run_build<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + 'a>> {
        Box::pin(async move {
            let _slot = match &self.gate {
                Some(gate) => {
                    debug!("waiting for build slot");
                    Some(gate.lock().await)
                }
                None => None,
            };

            match run_shell(command).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(error = %err, "build execution error");
                    BuildOutcome::spawn_failed(&err)
                }
            }
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn serialized_backend_never_overlaps() {
        let backend = ShellBackend::new(true);
        let other = backend.clone();

        let start = Instant::now();
        let (a, b) = tokio::join!(
            backend.run_build("sleep 0.3"),
            other.run_build("sleep 0.3")
        );
        assert!(a.success && b.success);
        assert!(start.elapsed() >= Duration::from_millis(600));
    }

    #[tokio::test]
    async fn unserialized_backend_runs_concurrently() {
        let backend = ShellBackend::new(false);
        let other = backend.clone();

        let start = Instant::now();
        let (a, b) = tokio::join!(
            backend.run_build("sleep 0.5"),
            other.run_build("sleep 0.5")
        );
        assert!(a.success && b.success);
        assert!(start.elapsed() < Duration::from_millis(950));
    }
}
