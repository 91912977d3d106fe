// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Registering the directory tree with a filesystem watcher (`notify`).
//! - Bridging watcher callbacks into async channels.
//! - Classifying and filtering raw change notifications.
//!
//! It does **not** run builds; it only tells the engine which changes
//! matter.

pub mod filter;
pub mod path_utils;
pub mod registrar;
pub mod source;

pub use filter::{ChangeEvent, ChangeKind, EventFilter, FilterDecision, RejectReason};
pub use registrar::{register_tree, WatchRegistry, WatchSet};
pub use source::{EventSource, EventStreams};
