// src/watch/filter.rs

//! Change classification and noise filtering.
//!
//! Every raw `notify::Event` is split into one [`ChangeEvent`] per path and
//! run through [`EventFilter::evaluate`], which applies, in order:
//!
//! 1. backup files (`...~`) are rejected unconditionally;
//! 2. paths containing an ignore-list substring are rejected;
//! 3. only content writes, creates and removes are accepted.

use std::fmt;
use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::EventKind;

use crate::config::IgnoreList;
use crate::watch::path_utils::display_str;

/// Suffix editors use for backup copies (`main.rs~`).
pub const BACKUP_SUFFIX: char = '~';

/// What happened to a path, reduced to the distinctions the filter cares
/// about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Write,
    Create,
    Remove,
    /// Metadata, the source half of a rename, access and anything
    /// unclassified.
    Other,
}

impl ChangeKind {
    /// Map a `notify` event kind.
    ///
    /// `Modify(Any)` and `Modify(Other)` count as writes: several backends
    /// (kqueue, polling) cannot tell content changes apart from the rest.
    ///
    /// A path renamed into place (`Name(To)`, or the destination of
    /// `Name(Both)`) is a create, which is how atomic editor saves show up.
    /// A lone `Name(From)` half stays `Other`.
    pub fn from_event_kind(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => ChangeKind::Create,
            EventKind::Remove(_) => ChangeKind::Remove,
            EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Any)
            | EventKind::Modify(ModifyKind::Other) => ChangeKind::Write,
            EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Both)) => {
                ChangeKind::Create
            }
            _ => ChangeKind::Other,
        }
    }

    pub fn is_relevant(self) -> bool {
        matches!(self, ChangeKind::Write | ChangeKind::Create | ChangeKind::Remove)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Write => "write",
            ChangeKind::Create => "create",
            ChangeKind::Remove => "remove",
            ChangeKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// A single path-level change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Split a `notify::Event` into one change per reported path.
    ///
    /// A `Name(Both)` rename carries `[from, to]`; only the destination is
    /// kept.
    pub fn from_notify(event: notify::Event) -> Vec<ChangeEvent> {
        let kind = ChangeKind::from_event_kind(&event.kind);
        let mut paths = event.paths;
        if matches!(
            event.kind,
            EventKind::Modify(ModifyKind::Name(RenameMode::Both))
        ) && paths.len() >= 2
        {
            paths = paths.split_off(1);
        }
        paths
            .into_iter()
            .map(|path| ChangeEvent { path, kind })
            .collect()
    }
}

/// Why a change was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    BackupFile,
    /// Holds the ignore-list entry that matched.
    Ignored(String),
    IrrelevantKind(ChangeKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    /// Carries the path as it should be shown to the user.
    Accept { display_path: String },
    Reject(RejectReason),
}

impl FilterDecision {
    pub fn is_accept(&self) -> bool {
        matches!(self, FilterDecision::Accept { .. })
    }
}

/// Stateless filter over change events.
///
/// Paths are checked relative to `root`, so an ignore entry like `.cache`
/// does not silence a whole project that happens to live under
/// `~/.cache/...`.
#[derive(Debug, Clone)]
pub struct EventFilter {
    root: PathBuf,
    ignore: IgnoreList,
}

impl EventFilter {
    pub fn new(root: impl Into<PathBuf>, ignore: IgnoreList) -> Self {
        Self {
            root: root.into(),
            ignore,
        }
    }

    pub fn evaluate(&self, event: &ChangeEvent) -> FilterDecision {
        let display_path = display_str(&self.root, &event.path);
        self.evaluate_str(display_path, event.kind)
    }

    /// Apply the policy to an already-normalized path string.
    pub fn evaluate_str(&self, path: String, kind: ChangeKind) -> FilterDecision {
        if path.ends_with(BACKUP_SUFFIX) {
            return FilterDecision::Reject(RejectReason::BackupFile);
        }
        if let Some(entry) = self.ignore.matching(&path) {
            return FilterDecision::Reject(RejectReason::Ignored(entry.to_string()));
        }
        if !kind.is_relevant() {
            return FilterDecision::Reject(RejectReason::IrrelevantKind(kind));
        }
        FilterDecision::Accept { display_path: path }
    }
}
