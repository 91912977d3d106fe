// src/watch/source.rs

use std::path::Path;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::errors::Result;
use crate::watch::registrar::WatchRegistry;

/// Receiving ends of the event source.
///
/// Owned by the dispatcher task. Either channel closing ends the watch loop.
#[derive(Debug)]
pub struct EventStreams {
    pub events: mpsc::UnboundedReceiver<Event>,
    pub errors: mpsc::UnboundedReceiver<notify::Error>,
}

impl EventStreams {
    /// Fresh pair of channels, returning the senders for feeding them.
    ///
    /// Used by [`EventSource::new`] and by tests that drive a dispatcher
    /// without a real watcher.
    pub fn channel() -> (
        mpsc::UnboundedSender<Event>,
        mpsc::UnboundedSender<notify::Error>,
        Self,
    ) {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();
        (event_tx, error_tx, Self { events, errors })
    }
}

/// The `notify` watcher plus the registration API.
///
/// Dropping this stops file watching and closes both channels.
pub struct EventSource {
    inner: RecommendedWatcher,
}

impl std::fmt::Debug for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSource").finish_non_exhaustive()
    }
}

impl EventSource {
    /// Create the platform watcher. Nothing is watched until directories are
    /// registered.
    pub fn new() -> Result<(Self, EventStreams)> {
        let (event_tx, error_tx, streams) = EventStreams::channel();

        // Called synchronously on notify's own thread; hand everything over
        // to the async side untouched.
        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event_tx.send(event).is_err() {
                        trace!("event receiver gone; dropping notify event");
                    }
                }
                Err(err) => {
                    if error_tx.send(err).is_err() {
                        trace!("error receiver gone; dropping notify error");
                    }
                }
            },
            Config::default(),
        )?;

        debug!("event source created");
        Ok((Self { inner: watcher }, streams))
    }
}

impl WatchRegistry for EventSource {
    fn register(&mut self, dir: &Path) -> Result<()> {
        self.inner.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(())
    }
}
