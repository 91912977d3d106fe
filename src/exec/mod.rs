// src/exec/mod.rs

//! Build execution layer.
//!
//! This module is responsible for actually running the build command through
//! a shell, using `tokio::process::Command`, and handing back a
//! [`BuildOutcome`].
//!
//! - [`command`] spawns the shell and collects combined stdout/stderr.
//! - [`backend`] provides the `BuildBackend` trait and the production
//!   `ShellBackend`, which tests replace with a fake.

pub mod backend;
pub mod command;

pub use backend::{BuildBackend, ShellBackend};
pub use command::run_shell;

/// Result of one build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Exit status zero.
    pub success: bool,
    /// `None` when the process was killed by a signal or never started.
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr, in arrival order.
    pub output: Vec<u8>,
}

impl BuildOutcome {
    pub fn succeeded(output: Vec<u8>) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            output,
        }
    }

    pub fn failed(exit_code: Option<i32>, output: Vec<u8>) -> Self {
        Self {
            success: false,
            exit_code,
            output,
        }
    }

    /// The shell could not be started (or waited on) at all.
    pub fn spawn_failed(err: &anyhow::Error) -> Self {
        Self::failed(None, format!("{err:#}\n").into_bytes())
    }

    pub fn output_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}
