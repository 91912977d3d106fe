#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use buildwatch::config::IgnoreList;
use buildwatch::engine::{CoreDispatcher, Dispatcher};
use buildwatch::fs::mock::MockFileSystem;
use buildwatch::watch::{EventFilter, EventStreams};
use buildwatch_test_utils::buffer::SharedBuffer;
use buildwatch_test_utils::fake_backend::FakeBuildBackend;
use buildwatch_test_utils::registry::RecordingRegistry;
use notify::event::{CreateKind, DataChange, ModifyKind};
use notify::{Event, EventKind};
use tokio::sync::mpsc::UnboundedSender;

pub use buildwatch_test_utils::init_tracing;

pub const ROOT: &str = "/work";

/// Everything a dispatcher test needs to drive and observe one dispatcher.
pub struct Harness {
    pub events: UnboundedSender<Event>,
    pub errors: UnboundedSender<notify::Error>,
    pub backend: FakeBuildBackend,
    pub output: SharedBuffer,
    pub registry: RecordingRegistry,
    pub fs: MockFileSystem,
    pub dispatcher: Dispatcher<FakeBuildBackend>,
}

pub fn harness(command: &str, ignore: &[&str], backend: FakeBuildBackend) -> Harness {
    harness_with(command, ignore, backend, false)
}

pub fn harness_with(
    command: &str,
    ignore: &[&str],
    backend: FakeBuildBackend,
    watch_new_dirs: bool,
) -> Harness {
    let (events, errors, streams) = EventStreams::channel();
    let output = SharedBuffer::new();
    let registry = RecordingRegistry::new();
    let fs = MockFileSystem::new();

    let core = CoreDispatcher::new(
        EventFilter::new(ROOT, IgnoreList::new(ignore.iter().copied())),
        watch_new_dirs,
    );
    let dispatcher = Dispatcher::new(
        core,
        streams,
        Box::new(registry.clone()),
        Arc::new(fs.clone()),
        backend.clone(),
        output.reporter(),
        command,
    );

    Harness {
        events,
        errors,
        backend,
        output,
        registry,
        fs,
        dispatcher,
    }
}

pub fn abs(rel: &str) -> PathBuf {
    PathBuf::from(ROOT).join(rel)
}

pub fn write_event(rel: &str) -> Event {
    Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(abs(rel))
}

pub fn create_event(rel: &str, kind: CreateKind) -> Event {
    Event::new(EventKind::Create(kind)).add_path(abs(rel))
}
