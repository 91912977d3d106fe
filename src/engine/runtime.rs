// src/engine/runtime.rs

use std::collections::VecDeque;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::engine::{BuildTrigger, CoreCommand, CoreDispatcher, CoreStep};
use crate::exec::BuildBackend;
use crate::fs::FileSystem;
use crate::report::Reporter;
use crate::watch::{register_tree, ChangeEvent, EventStreams, WatchRegistry};

/// Background watch loop.
///
/// Exclusively owns the event source channels (and, through `registry`, the
/// watcher itself). Feeds everything into [`CoreDispatcher`] and executes the
/// returned commands. Builds are awaited inline, so while one runs, incoming
/// notifications simply accumulate in the channels.
pub struct Dispatcher<B: BuildBackend> {
    core: CoreDispatcher,
    streams: EventStreams,
    registry: Box<dyn WatchRegistry>,
    fs: Arc<dyn FileSystem>,
    backend: B,
    reporter: Reporter,
    command: String,
}

impl<B: BuildBackend> fmt::Debug for Dispatcher<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("core", &self.core)
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl<B: BuildBackend> Dispatcher<B> {
    pub fn new(
        core: CoreDispatcher,
        streams: EventStreams,
        registry: Box<dyn WatchRegistry>,
        fs: Arc<dyn FileSystem>,
        backend: B,
        reporter: Reporter,
        command: impl Into<String>,
    ) -> Self {
        Self {
            core,
            streams,
            registry,
            fs,
            backend,
            reporter,
            command: command.into(),
        }
    }

    /// Main event loop.
    ///
    /// - Runs the startup build.
    /// - Consumes change events and watcher errors until either channel
    ///   closes.
    ///
    /// Returns the core so callers (tests) can inspect the final state.
    pub async fn run(mut self) -> CoreDispatcher {
        info!(cmd = %self.command, "dispatcher started");

        let step = self.core.start();
        self.execute(step).await;

        loop {
            // Events first: a closed error channel must not cut off events
            // that are still buffered.
            let step = tokio::select! {
                biased;

                maybe_event = self.streams.events.recv() => match maybe_event {
                    Some(event) => {
                        debug!(?event, "received notify event");
                        for change in ChangeEvent::from_notify(event) {
                            let step = self.core.on_change(change);
                            self.execute(step).await;
                        }
                        continue;
                    }
                    None => {
                        info!("event channel closed");
                        self.core.on_channel_closed()
                    }
                },
                maybe_err = self.streams.errors.recv() => match maybe_err {
                    Some(err) => self.core.on_watch_error(err.to_string()),
                    None => {
                        info!("error channel closed");
                        self.core.on_channel_closed()
                    }
                },
            };

            if !self.execute(step).await {
                break;
            }
        }

        info!("watch loop ended");
        self.core
    }

    /// Execute core commands; builds feed their completion back into the core
    /// and the resulting commands run next.
    async fn execute(&mut self, step: CoreStep) -> bool {
        let mut pending: VecDeque<CoreCommand> = step.commands.into();

        while let Some(command) = pending.pop_front() {
            match command {
                CoreCommand::AnnounceChange(path) => {
                    info!(path = %path, "change detected");
                    self.reporter.change_detected(&path);
                }
                CoreCommand::WatchIfDirectory(path) => self.watch_new_directory(&path),
                CoreCommand::RunBuild(trigger) => {
                    let next = self.build(trigger).await;
                    pending.extend(next.commands);
                }
                CoreCommand::LogWatchError(message) => {
                    warn!(error = %message, "file watch error");
                }
            }
        }

        step.keep_running
    }

    async fn build(&mut self, trigger: BuildTrigger) -> CoreStep {
        debug!(?trigger, "running build");
        let outcome = self.backend.run_build(&self.command).await;
        self.reporter.build_finished(&outcome);
        self.core.on_build_finished(&outcome)
    }

    fn watch_new_directory(&mut self, path: &Path) {
        if self.fs.is_symlink(path) || !self.fs.is_dir(path) {
            return;
        }
        match register_tree(self.fs.as_ref(), path, self.registry.as_mut()) {
            Ok(set) => info!(path = ?path, dirs = set.len(), "watching new directory"),
            Err(err) => warn!(path = ?path, error = %err, "failed to watch new directory"),
        }
    }
}
