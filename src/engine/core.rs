// src/engine/core.rs

//! Pure core dispatcher state machine.
//!
//! This module contains a synchronous, deterministic "core" that consumes
//! change events, build completions and watcher errors, and produces:
//! - an updated state (`Idle` / `Building`)
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Dispatcher`) is responsible for:
//! - reading events from the event source channels
//! - running builds through a `BuildBackend`
//! - printing through the `Reporter`
//!
//! The core is intended to be unit tested without any Tokio, channels,
//! filesystem, or processes.

use tracing::debug;

use crate::engine::{BuildTrigger, CoreCommand, CoreStep, DispatcherState};
use crate::exec::BuildOutcome;
use crate::watch::{ChangeEvent, ChangeKind, EventFilter, FilterDecision};

/// Pure dispatcher state.
///
/// The runtime awaits every build before handing over the next input, so
/// changes arriving meanwhile wait in the event channel. Nothing is
/// coalesced: N accepted changes produce N builds.
#[derive(Debug)]
pub struct CoreDispatcher {
    filter: EventFilter,
    watch_new_dirs: bool,
    state: DispatcherState,
    started: bool,
    builds_started: u64,
}

impl CoreDispatcher {
    pub fn new(filter: EventFilter, watch_new_dirs: bool) -> Self {
        Self {
            filter,
            watch_new_dirs,
            state: DispatcherState::Idle,
            started: false,
            builds_started: 0,
        }
    }

    pub fn state(&self) -> &DispatcherState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DispatcherState::Idle
    }

    pub fn builds_started(&self) -> u64 {
        self.builds_started
    }

    /// Startup transition: always exactly one build, before anything else.
    ///
    /// Calling it again is a no-op.
    pub fn start(&mut self) -> CoreStep {
        if self.started {
            return CoreStep::idle();
        }
        self.started = true;
        CoreStep::run(vec![self.begin_build(BuildTrigger::Startup)])
    }

    /// Handle one path-level change.
    pub fn on_change(&mut self, event: ChangeEvent) -> CoreStep {
        match self.filter.evaluate(&event) {
            FilterDecision::Reject(reason) => {
                debug!(path = ?event.path, kind = %event.kind, ?reason, "change ignored");
                CoreStep::idle()
            }
            FilterDecision::Accept { display_path } => {
                CoreStep::run(self.accept(event, display_path))
            }
        }
    }

    /// Building → Idle.
    pub fn on_build_finished(&mut self, outcome: &BuildOutcome) -> CoreStep {
        if let DispatcherState::Building(trigger) = &self.state {
            debug!(?trigger, success = outcome.success, "build finished");
        }
        self.state = DispatcherState::Idle;
        CoreStep::idle()
    }

    /// Asynchronous watcher errors are logged and otherwise ignored.
    pub fn on_watch_error(&mut self, message: String) -> CoreStep {
        CoreStep::run(vec![CoreCommand::LogWatchError(message)])
    }

    /// An event source channel closed: the watch loop ends.
    pub fn on_channel_closed(&mut self) -> CoreStep {
        CoreStep::stop()
    }

    fn accept(&mut self, event: ChangeEvent, display_path: String) -> Vec<CoreCommand> {
        let mut commands = vec![CoreCommand::AnnounceChange(display_path.clone())];
        if self.watch_new_dirs && event.kind == ChangeKind::Create {
            commands.push(CoreCommand::WatchIfDirectory(event.path));
        }
        commands.push(self.begin_build(BuildTrigger::FileChange(display_path)));
        commands
    }

    fn begin_build(&mut self, trigger: BuildTrigger) -> CoreCommand {
        self.builds_started += 1;
        self.state = DispatcherState::Building(trigger.clone());
        CoreCommand::RunBuild(trigger)
    }
}
