// src/config/model.rs

use std::fmt;
use std::path::PathBuf;

use crate::cli::CliArgs;

/// Substrings ignored out of the box. `target/` keeps cargo's own output from
/// retriggering the build; the trailing slash spares sources such as
/// `src/target.rs`.
pub const DEFAULT_IGNORES: &[&str] = &[".git", ".hg", ".svn", ".cache", "target/"];

/// Ordered list of path substrings whose changes are ignored.
///
/// Matching is a plain, case-sensitive `contains` check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    entries: Vec<String>,
}

impl IgnoreList {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in defaults, in order.
    pub fn defaults() -> Self {
        Self::new(DEFAULT_IGNORES.iter().copied())
    }

    /// Append entries, keeping order. Duplicates are kept; they are harmless.
    pub fn extend<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.extend(entries.into_iter().map(Into::into));
    }

    /// First entry contained in `path`, if any.
    pub fn matching(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .map(String::as_str)
            .find(|entry| path.contains(entry))
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.matching(path).is_some()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for IgnoreList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.entries.join(", "))
    }
}

/// Configuration exactly as collected from the command line, before
/// validation.
#[derive(Debug, Clone)]
pub struct RawWatchConfig {
    pub command: String,
    pub ignore: Vec<String>,
    pub use_default_ignores: bool,
    pub root: PathBuf,
    pub serialize_builds: bool,
    pub watch_new_dirs: bool,
    pub color: bool,
}

impl RawWatchConfig {
    /// Collect raw settings from parsed CLI args.
    ///
    /// `root` is where the tree walk starts; `main` passes `.`.
    pub fn from_args(args: &CliArgs, root: impl Into<PathBuf>) -> Self {
        Self {
            command: args.command.clone(),
            ignore: args.ignore.clone(),
            use_default_ignores: !args.no_default_ignore,
            root: root.into(),
            serialize_builds: args.serialize_builds,
            watch_new_dirs: args.watch_new_dirs,
            color: !args.no_color,
        }
    }
}

/// Validated, immutable configuration shared by every component.
///
/// Construct via `WatchConfig::try_from(RawWatchConfig)`; see
/// `config::validate`.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    command: String,
    ignore: IgnoreList,
    root: PathBuf,
    serialize_builds: bool,
    watch_new_dirs: bool,
    color: bool,
}

impl WatchConfig {
    /// Build a config without validation. Only `validate` calls this.
    pub(crate) fn new_unchecked(raw: RawWatchConfig) -> Self {
        let mut ignore = if raw.use_default_ignores {
            IgnoreList::defaults()
        } else {
            IgnoreList::default()
        };
        ignore.extend(raw.ignore);

        Self {
            command: raw.command,
            ignore,
            root: raw.root,
            serialize_builds: raw.serialize_builds,
            watch_new_dirs: raw.watch_new_dirs,
            color: raw.color,
        }
    }

    /// The build command, verbatim.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn ignore(&self) -> &IgnoreList {
        &self.ignore
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn serialize_builds(&self) -> bool {
        self.serialize_builds
    }

    pub fn watch_new_dirs(&self) -> bool {
        self.watch_new_dirs
    }

    /// Whether colors were not disabled on the command line. The terminal
    /// check happens in `report`.
    pub fn color(&self) -> bool {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_returns_first_entry_in_order() {
        let list = IgnoreList::new([".cache", "cache"]);
        assert_eq!(list.matching("a/.cache/b"), Some(".cache"));
        assert_eq!(list.matching("a/cache/b"), Some("cache"));
        assert_eq!(list.matching("src/main.rs"), None);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let list = IgnoreList::new([".git"]);
        assert!(!list.is_ignored("project/.GIT/HEAD"));
        assert!(list.is_ignored("project/.git/HEAD"));
    }

    #[test]
    fn default_target_entry_only_matches_the_directory() {
        let list = IgnoreList::defaults();
        assert!(list.is_ignored("target/debug/buildwatch"));
        assert!(list.is_ignored("crates/core/target/release/libcore.rlib"));
        assert!(!list.is_ignored("src/target.rs"));
        assert!(!list.is_ignored("src/retarget/mod.rs"));
    }

    #[test]
    fn display_lists_entries() {
        let list = IgnoreList::new([".git", "target"]);
        assert_eq!(list.to_string(), "[.git, target]");
    }
}
