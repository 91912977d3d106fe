use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use buildwatch::errors::{BuildwatchError, Result};
use buildwatch::watch::WatchRegistry;

/// Registry that remembers what was registered and can be told to refuse a
/// specific directory.
#[derive(Clone, Default)]
pub struct RecordingRegistry {
    registered: Arc<Mutex<Vec<PathBuf>>>,
    refuse: Option<PathBuf>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing(dir: impl Into<PathBuf>) -> Self {
        Self {
            refuse: Some(dir.into()),
            ..Self::default()
        }
    }

    /// Registered directories, sorted.
    pub fn registered(&self) -> Vec<PathBuf> {
        let mut dirs = self.registered.lock().unwrap().clone();
        dirs.sort();
        dirs
    }
}

impl WatchRegistry for RecordingRegistry {
    fn register(&mut self, dir: &Path) -> Result<()> {
        if self.refuse.as_deref() == Some(dir) {
            return Err(BuildwatchError::Watch(notify::Error::generic(
                "permission denied",
            )));
        }
        self.registered.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }
}
