// tests/watch_end_to_end.rs
//
// Real notify watcher on a temporary tree, fake build backend.

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use buildwatch::config::IgnoreList;
use buildwatch::engine::{CoreDispatcher, Dispatcher};
use buildwatch::fs::{FileSystem, RealFileSystem};
use buildwatch::watch::{register_tree, EventFilter, EventSource};
use buildwatch_test_utils::buffer::SharedBuffer;
use buildwatch_test_utils::fake_backend::FakeBuildBackend;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

/// Poll `cond` every 50ms for up to 5 seconds.
async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    cond()
}

#[tokio::test]
async fn writing_a_nested_source_file_triggers_a_build() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    fs::create_dir_all(dir.path().join("src/nested"))?;
    fs::create_dir_all(dir.path().join("target"))?;
    let fs_impl: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let root = fs_impl.canonicalize(dir.path())?;

    let (mut source, streams) = EventSource::new()?;
    let set = register_tree(fs_impl.as_ref(), &root, &mut source)?;
    assert_eq!(set.len(), 4);

    let backend = FakeBuildBackend::new();
    let output = SharedBuffer::new();
    let core = CoreDispatcher::new(EventFilter::new(root.clone(), IgnoreList::defaults()), false);
    let dispatcher = Dispatcher::new(
        core,
        streams,
        Box::new(source),
        Arc::clone(&fs_impl),
        backend.clone(),
        output.reporter(),
        "make",
    );
    let handle = tokio::spawn(dispatcher.run());

    assert!(eventually(|| backend.build_count() == 1).await, "startup build");

    // Ignored directory: no build.
    fs::write(root.join("target/out.o"), b"obj")?;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(backend.build_count(), 1);

    fs::write(root.join("src/nested/mod.rs"), b"pub fn f() {}\n")?;
    assert!(
        eventually(|| backend.build_count() >= 2).await,
        "change-triggered build"
    );
    assert!(output.text().contains("Detected change in file: src/nested/mod.rs"));

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn atomic_save_by_rename_triggers_a_build() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    fs::create_dir_all(dir.path().join("src"))?;
    fs::write(dir.path().join("src/main.rs"), b"fn main() {}\n")?;
    let fs_impl: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let root = fs_impl.canonicalize(dir.path())?;

    let (mut source, streams) = EventSource::new()?;
    register_tree(fs_impl.as_ref(), &root, &mut source)?;

    let backend = FakeBuildBackend::new();
    let output = SharedBuffer::new();
    let core = CoreDispatcher::new(EventFilter::new(root.clone(), IgnoreList::defaults()), false);
    let dispatcher = Dispatcher::new(
        core,
        streams,
        Box::new(source),
        Arc::clone(&fs_impl),
        backend.clone(),
        output.reporter(),
        "make",
    );
    let handle = tokio::spawn(dispatcher.run());

    assert!(eventually(|| backend.build_count() == 1).await, "startup build");

    // Temp file outside the tree, then renamed over the watched source.
    let scratch = TempDir::new()?;
    let tmp = scratch.path().join("main.rs.tmp");
    fs::write(&tmp, b"fn main() { println!(\"saved\"); }\n")?;
    if fs::rename(&tmp, root.join("src/main.rs")).is_err() {
        // Different filesystem; stage the temp file inside the tree instead.
        let staged = root.join("src/.main.rs.tmp~");
        fs::copy(&tmp, &staged)?;
        fs::rename(&staged, root.join("src/main.rs"))?;
    }

    assert!(
        eventually(|| backend.build_count() >= 2).await,
        "rename-triggered build"
    );
    assert!(output.text().contains("Detected change in file: src/main.rs"));

    handle.abort();
    Ok(())
}
