// src/config/mod.rs

//! Configuration for buildwatch.
//!
//! There is no config file: everything comes from the command line.
//!
//! Responsibilities:
//! - Define the raw (as parsed) and validated data model (`model.rs`).
//! - Validate basic invariants like a non-blank command (`validate.rs`).

pub mod model;
pub mod validate;

pub use model::{IgnoreList, RawWatchConfig, WatchConfig, DEFAULT_IGNORES};
