// src/watch/registrar.rs

//! Startup tree walk: register every directory under the root with the
//! event source.
//!
//! Watching is directory-granular. Coverage is exactly the set of
//! directories that exist when the walk runs; directories created later are
//! only picked up with `--watch-new-dirs`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::errors::{BuildwatchError, Result};
use crate::fs::FileSystem;

/// Anything directories can be registered with.
///
/// Implemented by [`crate::watch::EventSource`] in production and by
/// recording fakes in tests.
pub trait WatchRegistry: Send {
    /// Start observing changes directly inside `dir` (non-recursive).
    fn register(&mut self, dir: &Path) -> Result<()>;
}

/// Directories registered by one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSet {
    dirs: BTreeSet<PathBuf>,
}

impl WatchSet {
    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.contains(dir)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    fn insert(&mut self, dir: PathBuf) {
        self.dirs.insert(dir);
    }
}

/// Walk `root` depth-first and register it and every directory below it.
///
/// Symlinked directories are neither registered nor descended into. The
/// first unreadable directory or failed registration aborts the walk.
pub fn register_tree(
    fs: &dyn FileSystem,
    root: &Path,
    registry: &mut dyn WatchRegistry,
) -> Result<WatchSet> {
    if !fs.is_dir(root) {
        return Err(BuildwatchError::Walk {
            path: root.to_path_buf(),
            source: anyhow::anyhow!("not a directory"),
        });
    }

    let mut set = WatchSet::default();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        registry.register(&dir)?;
        trace!(dir = ?dir, "registered directory");

        let entries = fs.read_dir(&dir).map_err(|source| BuildwatchError::Walk {
            path: dir.clone(),
            source,
        })?;

        for path in entries {
            if fs.is_symlink(&path) {
                debug!(path = ?path, "not following symlink");
                continue;
            }
            if fs.is_dir(&path) {
                stack.push(path);
            }
        }

        set.insert(dir);
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[derive(Default)]
    struct Collect(Vec<PathBuf>);

    impl WatchRegistry for Collect {
        fn register(&mut self, dir: &Path) -> Result<()> {
            self.0.push(dir.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn registers_directories_only() {
        let fs = MockFileSystem::new();
        fs.add_file("./Cargo.toml");
        fs.add_file("./src/main.rs");
        fs.add_file("./src/bin/tool.rs");
        fs.add_dir("./docs");

        let mut registry = Collect::default();
        let set = register_tree(&fs, Path::new("."), &mut registry).unwrap();

        let mut got = registry.0.clone();
        got.sort();
        assert_eq!(
            got,
            vec![
                PathBuf::from("."),
                PathBuf::from("./docs"),
                PathBuf::from("./src"),
                PathBuf::from("./src/bin"),
            ]
        );
        assert_eq!(set.len(), 4);
        assert!(!set.is_empty());
        assert!(set.contains(Path::new("./src/bin")));
        assert!(!set.contains(Path::new("./src/main.rs")));
    }

    #[test]
    fn symlinked_directories_are_skipped() {
        let fs = MockFileSystem::new();
        fs.add_dir("./real");
        fs.add_dir_symlink("./loop", ".");

        let mut registry = Collect::default();
        let set = register_tree(&fs, Path::new("."), &mut registry).unwrap();

        assert_eq!(set.len(), 2);
        assert!(!set.contains(Path::new("./loop")));
    }

    #[test]
    fn unreadable_directory_aborts_walk() {
        let fs = MockFileSystem::new();
        fs.add_file("./locked/secret.txt");
        fs.deny_read("./locked");

        let mut registry = Collect::default();
        let err = register_tree(&fs, Path::new("."), &mut registry).unwrap_err();

        match err {
            BuildwatchError::Walk { path, .. } => assert_eq!(path, PathBuf::from("./locked")),
            other => panic!("expected Walk error, got {other:?}"),
        }
    }

    #[test]
    fn missing_root_is_an_error() {
        let fs = MockFileSystem::new();
        let mut registry = Collect::default();
        let result = register_tree(&fs, Path::new("./nope"), &mut registry);
        assert!(matches!(result, Err(BuildwatchError::Walk { .. })));
        assert!(registry.0.is_empty());
    }
}
