// src/engine/mod.rs

//! Dispatch engine for buildwatch.
//!
//! This module ties together:
//! - the change filter (which notifications matter)
//! - the Idle/Building state machine deciding when a build runs
//! - the background task that reacts to:
//!   - filesystem change events
//!   - asynchronous watcher errors
//! - the foreground stdin trigger loop
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`]; manual re-triggers live in [`stdin`].

use std::path::PathBuf;

/// Why a build was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildTrigger {
    /// The one build run when watching starts.
    Startup,
    /// A change that passed the filter; holds the displayed path.
    FileChange(String),
    /// A line read from stdin.
    Stdin,
}

/// Dispatcher state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatcherState {
    Idle,
    Building(BuildTrigger),
}

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Print the "detected change" notice for this path.
    AnnounceChange(String),
    /// Register the path with the event source if it is a directory
    /// (only emitted with `--watch-new-dirs`).
    WatchIfDirectory(PathBuf),
    /// Run the build command to completion, then report back through
    /// `CoreDispatcher::on_build_finished`.
    RunBuild(BuildTrigger),
    /// Log an asynchronous watcher error and carry on.
    LogWatchError(String),
}

/// Decision returned by the core after handling a single input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub(crate) fn run(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    pub(crate) fn idle() -> Self {
        Self::run(Vec::new())
    }

    pub(crate) fn stop() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: false,
        }
    }
}

pub mod core;
pub mod runtime;
pub mod stdin;

pub use self::core::CoreDispatcher;
pub use runtime::Dispatcher;
pub use stdin::{run_stdin_loop, StdinExit};
